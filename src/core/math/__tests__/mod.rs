mod linalg_test;
