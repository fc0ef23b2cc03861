// Document generation pipeline: payload templating, the status-poll state
// machine, and the HTTP handlers that tie them to the NDAQ client.
// All upstream calls go through ndaq_client — no direct reqwest use here.

pub mod handlers;
pub mod poller;
pub mod template;
