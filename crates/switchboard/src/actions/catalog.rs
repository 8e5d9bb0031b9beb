use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{EndpointError, EndpointResult};
use crate::models::tool::Tool;
use crate::providers::configs::DriveConfig;

/// The closed set of tools offered to the model.
///
/// Lookup happens once by wire name; everything after that is exhaustive
/// matching on the variant, so a tool added here cannot be forgotten in the
/// argument parsing or the action mapping below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SaveOutput,
    SentMail,
    CreateTicket,
    DeleteTicket,
}

#[derive(Debug, Deserialize)]
struct SaveOutputArgs {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SentMailArgs {
    text: String,
    mail_id: String,
    subject: String,
}

#[derive(Debug, Deserialize)]
struct CreateTicketArgs {
    requester: String,
    subject: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DeleteTicketArgs {
    ticket_id: String,
}

/// A fully resolved call into the automation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub action: String,
    pub parameters: Value,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "save_output" => Some(ToolKind::SaveOutput),
            "sent_mail" => Some(ToolKind::SentMail),
            "create_ticket" => Some(ToolKind::CreateTicket),
            "delete_ticket" => Some(ToolKind::DeleteTicket),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SaveOutput => "save_output",
            ToolKind::SentMail => "sent_mail",
            ToolKind::CreateTicket => "create_ticket",
            ToolKind::DeleteTicket => "delete_ticket",
        }
    }

    /// The action suffix inside the automation pack. The drive upload keeps
    /// its backend name, which differs from the tool name the model sees.
    fn action_suffix(&self) -> &'static str {
        match self {
            ToolKind::SaveOutput => "upload_onedrive",
            ToolKind::SentMail => "send_mail",
            ToolKind::CreateTicket => "create_ticket",
            ToolKind::DeleteTicket => "delete_ticket",
        }
    }

    /// Parse the accumulated argument string and map it onto the automation
    /// action's parameters.
    pub fn invocation(
        &self,
        arguments: &str,
        pack: &str,
        drive: Option<&DriveConfig>,
    ) -> EndpointResult<Invocation> {
        let action = format!("{}.{}", pack, self.action_suffix());

        let parameters = match self {
            ToolKind::SaveOutput => {
                let args: SaveOutputArgs = self.parse(arguments)?;
                let mut parameters = json!({ "text": args.text });
                if let Some(drive) = drive {
                    let object = parameters.as_object_mut().unwrap();
                    object.insert("client_id".to_string(), json!(drive.client_id));
                    object.insert("client_secret".to_string(), json!(drive.client_secret));
                    object.insert("tenant_id".to_string(), json!(drive.tenant_id));
                    object.insert("usr_id".to_string(), json!(drive.user_id));
                }
                parameters
            }
            ToolKind::SentMail => {
                let args: SentMailArgs = self.parse(arguments)?;
                json!({
                    "email": args.mail_id,
                    "text": args.text,
                    "subject": args.subject,
                })
            }
            ToolKind::CreateTicket => {
                let args: CreateTicketArgs = self.parse(arguments)?;
                json!({
                    "requester": args.requester,
                    "subject": args.subject,
                    "description": args.description,
                })
            }
            ToolKind::DeleteTicket => {
                let args: DeleteTicketArgs = self.parse(arguments)?;
                json!({ "ticket_id": args.ticket_id })
            }
        };

        Ok(Invocation { action, parameters })
    }

    fn parse<'a, T: Deserialize<'a>>(&self, arguments: &'a str) -> EndpointResult<T> {
        serde_json::from_str(arguments).map_err(|source| EndpointError::InvalidArguments {
            name: self.name().to_string(),
            source,
        })
    }
}

/// The fixed tool catalogue attached to every completion request.
pub fn builtin_tools() -> Vec<Tool> {
    vec![
        Tool::new(
            "save_output",
            "Save the generated text in my drive",
            json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The whole generated text"
                    }
                },
                "required": ["text"]
            }),
        ),
        Tool::new(
            "sent_mail",
            "Send a mail to the respective mail id",
            json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The whole generated content of the mail"
                    },
                    "mail_id": {
                        "type": "string",
                        "description": "The mail id of the respective receiver"
                    },
                    "subject": {
                        "type": "string",
                        "description": "The subject of the mail"
                    }
                },
                "required": ["text", "mail_id", "subject"]
            }),
        ),
        Tool::new(
            "create_ticket",
            "create a new ticket in the ticketing system",
            json!({
                "type": "object",
                "properties": {
                    "requester": {
                        "type": "string",
                        "description": "The person who raised the ticket"
                    },
                    "subject": {
                        "type": "string",
                        "description": "The subject of the raised ticket"
                    },
                    "description": {
                        "type": "string",
                        "description": "The description of the raised ticket"
                    }
                },
                "required": ["requester", "subject", "description"]
            }),
        ),
        Tool::new(
            "delete_ticket",
            "delete an existing ticket in the ticketing system",
            json!({
                "type": "object",
                "properties": {
                    "ticket_id": {
                        "type": "string",
                        "description": "The id of the ticket to be deleted"
                    }
                },
                "required": ["ticket_id"]
            }),
        ),
    ]
}
