// Command module - registry, dispatch and the remote client seam
pub mod dispatcher;
pub mod registry;
pub mod remote;
pub mod transfer;

pub use dispatcher::{split_command, CommandDispatcher, Dispatched};
pub use registry::{CommandRegistry, CommandSpec, ParamSpec, PostProcess, RemoteOperation};
pub use remote::RemoteClient;
