use crate::domain::model::{GroupedMessages, MessageRequest};

/// Separator placed between consecutive bodies in a combined payload.
pub const PAYLOAD_SEPARATOR: &str = "\n\n";

/// Groups accepted requests by recipient, keeping arrival order within each recipient.
pub fn group_by_recipient<I>(requests: I) -> GroupedMessages
where
    I: IntoIterator<Item = MessageRequest>,
{
    let mut groups = GroupedMessages::new();
    for request in requests {
        groups.push(request.to, request.message);
    }
    groups
}

/// Joins a recipient's bodies into the single payload sent through the transport.
pub fn combine_messages(messages: &[String]) -> String {
    messages.join(PAYLOAD_SEPARATOR)
}
