pub(crate) mod api_error;
pub(crate) mod handlers;
pub(crate) mod request;
pub(crate) mod service;
pub(crate) mod state;
