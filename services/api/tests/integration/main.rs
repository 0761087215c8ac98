mod helpers;

mod access_test;
mod validation_test;
