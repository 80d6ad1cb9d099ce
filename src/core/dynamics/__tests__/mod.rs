mod forward_test;
mod inverse_test;
