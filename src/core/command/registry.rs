use crate::core::args::ParameterSchema;
use indexmap::IndexMap;
use std::fmt;

/// Remote operation a command maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteOperation {
    /// API resource the request is sent to
    pub resource: &'static str,
    /// Action requested on that resource
    pub action: &'static str,
}

/// Local handling applied around the remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    None,
    /// Narrow the queue by `instruct_command` / `instruct_instance`
    FilterResults,
    /// Write the returned file into a local directory
    Download,
    /// Read a local file and send its contents
    Upload,
}

/// Parameter declaration with its help line
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub help: &'static str,
}

/// A command the shell accepts
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub operation: RemoteOperation,
    pub params: Vec<ParamSpec>,
    pub post: PostProcess,
    schema: ParameterSchema,
}

impl CommandSpec {
    pub fn new(
        name: &'static str,
        summary: &'static str,
        operation: RemoteOperation,
        params: &[ParamSpec],
        post: PostProcess,
    ) -> Self {
        let schema = params
            .iter()
            .fold(ParameterSchema::new(), |schema, param| schema.param(param.name));
        Self {
            name,
            summary,
            operation,
            params: params.to_vec(),
            post,
            schema,
        }
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Detailed help for `help <command>`
    pub fn help_text(&self) -> String {
        let mut text = format!("\n{}\n", self.summary);
        for param in &self.params {
            let line = match param.help.split_once(' ') {
                Some((kind, rest)) if kind.starts_with('<') => {
                    format!("\n--{}={} - {}\n", param.name, kind, rest)
                }
                _ => format!("\n--{} - {}\n", param.name, param.help),
            };
            text.push_str(&line);
        }
        text
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.action)
    }
}

/// Command name to command lookup, in declaration order
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any previous one with the same name
    pub fn register(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.name, spec);
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every command supported by the control plane
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for spec in standard_commands() {
            registry.register(spec);
        }
        registry
    }
}

const fn op(resource: &'static str, action: &'static str) -> RemoteOperation {
    RemoteOperation { resource, action }
}

const fn p(name: &'static str, help: &'static str) -> ParamSpec {
    ParamSpec { name, help }
}

const TASK_NAME_REQUIRED: &str = "<string> (required) the name of the task";
const TASK_TYPE_REQUIRED: &str = "<string> (required) the name of the task type";
const USER_ID_REQUIRED: &str = "<string> (required) the ID of the user";
const PORTGROUP_REQUIRED: &str = "<string> (required) the name of the portgroup";
const DOMAIN_REQUIRED: &str = "<string> (required) the name of the domain";

fn standard_commands() -> Vec<CommandSpec> {
    use PostProcess::{Download, FilterResults, Upload};
    let none = PostProcess::None;

    vec![
        // Tasks
        CommandSpec::new("list_tasks", "List all running tasks.", op("task-control", "list"), &[], none),
        CommandSpec::new(
            "get_task",
            "Get details of a given task.",
            op("task-control", "get"),
            &[p("task_name", TASK_NAME_REQUIRED)],
            none,
        ),
        CommandSpec::new(
            "kill_task",
            "Force quit a running task.",
            op("task-control", "kill"),
            &[p("task_name", "<string> (required) the name of the task to kill")],
            none,
        ),
        CommandSpec::new(
            "run_task",
            "Run an attack container as a task.",
            op("task-control", "execute"),
            &[
                p("task_name", "<string> (required) a unique identifier to associate with the task"),
                p("task_type", "<string> (required) the type of attack container to be executed"),
                p("task_host_name", "<string> (optional) a host name to associate with the task"),
                p("task_domain_name", "<string> (optional) a domain name to associate with the task"),
                p("portgroups", "<string> (optional) a list of portgroups to associate with the task"),
                p("end_time", "<string> (optional) terminate the task at the given time"),
            ],
            none,
        ),
        CommandSpec::new(
            "instruct_task",
            "Interact with a running task.",
            op("remote-task", "instruct"),
            &[
                p("task_name", "<string> (required) the name of the task you want to instruct"),
                p(
                    "instruct_instance",
                    "<string> (required) a unique string to associate with the instruction (defaults to 'havoc')",
                ),
                p("instruct_command", "<string> (required) the command to send to the task"),
                p("instruct_args", "<string> (optional) a dictionary of arguments to pass with the command"),
            ],
            none,
        ),
        CommandSpec::new(
            "get_task_results",
            "Get results of an instruct_command.",
            op("remote-task", "get_results"),
            &[
                p("task_name", "<string> (required) the name of the task to retrieve results from"),
                p("instruct_command", "<string> (optional) the command to retrieve results for"),
                p("instruct_instance", "<string> (optional) the instruct_instance to retrieve results for"),
            ],
            FilterResults,
        ),
        // Task types
        CommandSpec::new("list_task_types", "List all available task types.", op("task-type", "list"), &[], none),
        CommandSpec::new(
            "get_task_type",
            "Get details of a given task type.",
            op("task-type", "get"),
            &[p("task_type", TASK_TYPE_REQUIRED)],
            none,
        ),
        CommandSpec::new(
            "create_task_type",
            "Create a new task type with the given parameters.",
            op("task-type", "create"),
            &[
                p("task_type", "<string> (required) a name to refer to the task type"),
                p("source_image", "<string> (required) URL of the source container image"),
                p("capabilities", "<list> (required) list of commands accepted by the task"),
                p("cpu", "<integer> (required) number of CPU cores to allocate to the task"),
                p("memory", "<integer> (required) amount of memory to allocate to the task"),
            ],
            none,
        ),
        CommandSpec::new(
            "delete_task_type",
            "Delete the given task type.",
            op("task-type", "delete"),
            &[p("task_type", TASK_TYPE_REQUIRED)],
            none,
        ),
        // Users
        CommandSpec::new("list_users", "List all users.", op("manage", "list"), &[], none),
        CommandSpec::new(
            "get_user",
            "Get details of a given user.",
            op("manage", "get"),
            &[p("user_id", USER_ID_REQUIRED)],
            none,
        ),
        CommandSpec::new(
            "create_user",
            "Create a new user with the given parameters.",
            op("manage", "create"),
            &[
                p("user_id", "<string> (required) a unique identifier to associate with the user"),
                p("admin", "[yes|no] (optional) whether the user has admin privileges (defaults to no)"),
            ],
            none,
        ),
        CommandSpec::new(
            "update_user",
            "Update an existing user.",
            op("manage", "update"),
            &[
                p("user_id", "<string> (required) the user_id of the user to update"),
                p("new_user_id", "<string> (optional) a new unique identifier for the user"),
                p("admin", "[yes|no] (optional) add or remove admin privileges (defaults to no change)"),
                p("reset_keys", "yes (optional) reset the user's API key and secret"),
            ],
            none,
        ),
        CommandSpec::new(
            "delete_user",
            "Delete an existing user.",
            op("manage", "delete"),
            &[p("user_id", USER_ID_REQUIRED)],
            none,
        ),
        // Files
        CommandSpec::new("list_files", "List all files in the shared workspace.", op("workspace", "list"), &[], none),
        CommandSpec::new(
            "get_file",
            "Download a file from the shared workspace.",
            op("workspace", "get"),
            &[
                p("file_name", "<string> (required) the name of the file to download"),
                p("file_path", "<string> (required) the local directory to download the file to"),
            ],
            Download,
        ),
        CommandSpec::new(
            "create_file",
            "Upload a file to the shared workspace.",
            op("workspace", "create"),
            &[
                p("file_name", "<string> (required) the name of the file to upload"),
                p("file_path", "<string> (required) the local directory where the file resides"),
            ],
            Upload,
        ),
        CommandSpec::new(
            "delete_file",
            "Delete a file in the shared workspace.",
            op("workspace", "delete"),
            &[p("file_name", "<string> (required) the name of the file to delete")],
            none,
        ),
        // Portgroups
        CommandSpec::new("list_portgroups", "List all existing portgroups.", op("portgroup", "list"), &[], none),
        CommandSpec::new(
            "get_portgroup",
            "Get details of a given portgroup.",
            op("portgroup", "get"),
            &[p("portgroup_name", PORTGROUP_REQUIRED)],
            none,
        ),
        CommandSpec::new(
            "create_portgroup",
            "Create a new portgroup with the given parameters.",
            op("portgroup", "create"),
            &[
                p("portgroup_name", "<string> (required) a unique identifier to associate with the portgroup"),
                p("portgroup_description", "<string> (required) a description of the portgroup's purpose"),
            ],
            none,
        ),
        CommandSpec::new(
            "update_portgroup_rule",
            "Add or remove a rule to or from a given portgroup.",
            op("portgroup", "update"),
            &[
                p("portgroup_name", "<string> (required) the name of the portgroup to modify"),
                p("portgroup_action", "[add|remove] (required) whether to add or remove a rule"),
                p("ip_ranges", "<string> (required) the IP address range allowed access by the rule"),
                p("port", "<integer> (required) the port number the IP ranges may access"),
                p("ip_protocol", "[udp|tcp|icmp] (required) the IP protocol the IP ranges may use"),
            ],
            none,
        ),
        CommandSpec::new(
            "delete_portgroup",
            "Delete an existing portgroup.",
            op("portgroup", "delete"),
            &[p("portgroup_name", PORTGROUP_REQUIRED)],
            none,
        ),
        // Domains
        CommandSpec::new("list_domains", "List all existing domains.", op("domain", "list"), &[], none),
        CommandSpec::new(
            "get_domain",
            "Get details of a given domain.",
            op("domain", "get"),
            &[p("domain_name", DOMAIN_REQUIRED)],
            none,
        ),
        CommandSpec::new(
            "create_domain",
            "Create a new domain with the given parameters.",
            op("domain", "create"),
            &[
                p("domain_name", "<string> (required) the domain name to create"),
                p("hosted_zone", "<string> (required) the zone ID of the hosted zone for the domain"),
            ],
            none,
        ),
        CommandSpec::new(
            "delete_domain",
            "Delete an existing domain.",
            op("domain", "delete"),
            &[p("domain_name", DOMAIN_REQUIRED)],
            none,
        ),
    ]
}
