pub mod ownership_validator;
pub mod upgrade_validator;
pub mod validator;
