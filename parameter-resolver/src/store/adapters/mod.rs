pub mod aws_parameter_store;
pub mod local_store;
