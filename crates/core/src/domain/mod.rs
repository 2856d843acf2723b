pub mod offering;
pub mod recommendation;
pub mod request;
