mod trainer_test;
