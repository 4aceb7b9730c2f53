pub(crate) mod contracts;
pub(crate) mod database;
pub(crate) mod deployments;
pub(crate) mod info;
pub(crate) mod tokens;
