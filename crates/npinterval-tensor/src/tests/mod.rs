mod proptest_arrays;
