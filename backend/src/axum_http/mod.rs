pub mod default_routers;
pub mod error_responses;
pub mod http_serve;
pub mod media_form;
pub mod query_params;
pub mod routers;

#[cfg(test)]
pub(crate) mod test_support;
