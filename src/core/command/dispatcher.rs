use crate::core::args::ArgumentParser;
use crate::core::command::registry::{CommandRegistry, PostProcess};
use crate::core::command::remote::RemoteClient;
use crate::core::command::transfer;
use crate::core::results::{filter, FilterCriteria, RemoteResponse};
use crate::domain::config::TokenizerMode;
use crate::domain::error::{HavocError, HavocResult};
use tracing::debug;

/// Response of a dispatched command, ready for formatting
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub command: String,
    pub response: RemoteResponse,
}

/// Routes operator input lines to remote operations
pub struct CommandDispatcher<C> {
    registry: CommandRegistry,
    client: C,
    parser: ArgumentParser,
}

impl<C: RemoteClient> CommandDispatcher<C> {
    pub fn new(registry: CommandRegistry, client: C, mode: TokenizerMode) -> Self {
        Self {
            registry,
            client,
            parser: ArgumentParser::new(mode),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one input line: `command --key=value ...`.
    ///
    /// Remote failures are returned unchanged; only an unknown command name
    /// or a local file problem originates here.
    pub async fn execute(&self, line: &str) -> HavocResult<Dispatched> {
        let (name, raw_args) = split_command(line);
        let spec = self
            .registry
            .get(name)
            .ok_or_else(|| HavocError::UnknownCommand(name.to_string()))?;

        let args = if spec.schema().is_empty() {
            spec.schema().defaults()
        } else {
            self.parser.parse(spec.schema(), raw_args)
        };
        debug!("Dispatching '{}' to {}", spec.name, spec.operation);

        let response = match spec.post {
            PostProcess::None => self.client.call(spec.operation, args.to_params()).await?,
            PostProcess::FilterResults => {
                let criteria = FilterCriteria::from_args(&args);
                let response = self.client.call(spec.operation, args.to_params()).await?;
                filter(response, &criteria)
            }
            PostProcess::Download => transfer::download(&self.client, spec.operation, args).await?,
            PostProcess::Upload => transfer::upload(&self.client, spec.operation, args).await?,
        };

        Ok(Dispatched {
            command: spec.name.to_string(),
            response,
        })
    }
}

/// Split a line into the command name and the rest
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::registry::RemoteOperation;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;

    struct CannedClient {
        response: Value,
        calls: Mutex<Vec<(RemoteOperation, Map<String, Value>)>>,
    }

    impl CannedClient {
        fn new(response: Value) -> Self {
            Self {
                response,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RemoteClient for CannedClient {
        async fn call(
            &self,
            operation: RemoteOperation,
            params: Map<String, Value>,
        ) -> HavocResult<RemoteResponse> {
            self.calls.lock().unwrap().push((operation, params));
            Ok(RemoteResponse::from_value(self.response.clone()).unwrap())
        }
    }

    fn dispatcher(response: Value) -> CommandDispatcher<CannedClient> {
        CommandDispatcher::new(
            CommandRegistry::standard(),
            CannedClient::new(response),
            TokenizerMode::Legacy,
        )
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("get_task --task_name=x"), ("get_task", "--task_name=x"));
        assert_eq!(split_command("  list_tasks  "), ("list_tasks", ""));
        assert_eq!(split_command(""), ("", ""));
    }

    #[tokio::test]
    async fn test_sends_every_schema_key() {
        let dispatcher = dispatcher(json!({"outcome": "success"}));
        let result = dispatcher
            .execute("create_user --user_id=alice --bogus=1")
            .await
            .unwrap();

        assert_eq!(result.command, "create_user");
        let calls = dispatcher.client().calls.lock().unwrap();
        let (operation, params) = &calls[0];
        assert_eq!(operation.to_string(), "manage/create");
        assert_eq!(params.len(), 2);
        assert_eq!(params["user_id"], json!("alice"));
        assert_eq!(params["admin"], json!(""));
    }

    #[tokio::test]
    async fn test_zero_argument_command_ignores_input() {
        let dispatcher = dispatcher(json!({"tasks": []}));
        dispatcher.execute("list_tasks --task_name=x").await.unwrap();

        let calls = dispatcher.client().calls.lock().unwrap();
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let dispatcher = dispatcher(json!({}));
        let err = dispatcher.execute("launch_missiles --now=yes").await.unwrap_err();
        assert!(matches!(err, HavocError::UnknownCommand(name) if name == "launch_missiles"));
        assert!(dispatcher.client().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_results_are_filtered() {
        let dispatcher = dispatcher(json!({
            "task_name": "t1",
            "queue": [
                {"instruct_command": "ls", "instruct_instance": "a"},
                {"instruct_command": "pwd", "instruct_instance": "a"},
            ],
        }));
        let result = dispatcher
            .execute("get_task_results --task_name=t1 --instruct_command=pwd")
            .await
            .unwrap();

        let queue = result.response.queue().unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0]["instruct_command"], json!("pwd"));
    }

    #[tokio::test]
    async fn test_other_commands_are_not_filtered() {
        let response = json!({
            "queue": [{"instruct_command": "ls", "instruct_instance": "a"}],
        });
        let dispatcher = dispatcher(response.clone());
        let result = dispatcher
            .execute("instruct_task --task_name=t1 --instruct_command=pwd")
            .await
            .unwrap();

        assert_eq!(result.response, RemoteResponse::from_value(response).unwrap());
    }
}
