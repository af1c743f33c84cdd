pub mod config_validator;
