//! Bounded multi-round tool-workflow executor
//!
//! Drives the model/tool exchange to completion: while the reply carries
//! tool calls, each call is executed through the caller-supplied handler and
//! the results are fed back; a reply without tool calls is the final answer.

use crate::client::ChatClient;
use crate::error::Result;
use crate::types::{CompletionRequest, Message, ToolCall, ToolHandler, ToolWorkflowResult};

/// Upper bound on model/tool exchange rounds before giving up
const MAX_TOOL_ROUNDS: usize = 8;

/// Run the tool workflow over the given client until the model produces a
/// final answer or the round bound is hit
///
/// Handler failures do not abort the workflow; the error text is returned to
/// the model as the tool's output so it can recover or explain.
///
/// # Errors
///
/// Returns the underlying client error if a completion call fails.
pub async fn run_tool_workflow(
    client: &dyn ChatClient,
    request: CompletionRequest,
    handler: &dyn ToolHandler,
) -> Result<ToolWorkflowResult> {
    let mut request = request;
    request.stream = false;

    let mut executed: Vec<ToolCall> = Vec::new();

    for round in 0..MAX_TOOL_ROUNDS {
        let response = client.send_completion(&request).await?;
        let Some(choice) = response.choices.into_iter().next() else {
            return Ok(ToolWorkflowResult::failure("server returned no choices"));
        };

        let content = choice.message.content.unwrap_or_default();
        let calls = choice.message.tool_calls.unwrap_or_default();

        if calls.is_empty() {
            tracing::debug!(rounds = round + 1, tool_calls = executed.len(), "tool workflow finished");
            return Ok(ToolWorkflowResult {
                success: true,
                final_response: content,
                executed_tool_calls: executed,
                error_message: None,
            });
        }

        request
            .messages
            .push(Message::assistant_tool_calls(content, calls.clone()));

        for call in calls {
            let output = match handler.handle(&call.function.name, &call.function.arguments).await {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(tool = %call.function.name, error = %e, "tool handler failed");
                    format!("error: {e}")
                }
            };
            request.messages.push(Message::tool_result(call.id.clone(), output));
            executed.push(call);
        }
    }

    tracing::warn!(rounds = MAX_TOOL_ROUNDS, "tool workflow did not converge");
    Ok(ToolWorkflowResult {
        success: false,
        final_response: String::new(),
        executed_tool_calls: executed,
        error_message: Some(format!(
            "tool workflow did not converge within {MAX_TOOL_ROUNDS} rounds"
        )),
    })
}
