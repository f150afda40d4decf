// Resume extraction: the gateway to the extraction capability, the boundary
// transport that reaches it from another process, and the view model that
// reconciles outcomes into the page's resource slot.

pub mod backend;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod observer;
pub mod prompts;
pub mod remote;
pub mod resource;
pub mod view_model;
