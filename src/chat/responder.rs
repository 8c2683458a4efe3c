use serde::Serialize;

use crate::models::MessageType;
use crate::zerodb::{KnowledgeStore, MemoryEntry, SearchHit};

use super::{ChatCompletion, ChatMessage};

const SYSTEM_PROMPT: &str = "You are Cody, a helpful and knowledgeable AI assistant for Blaq Digital. \
You provide accurate, professional, and friendly answers about our AI development services, \
RAG systems, and web development solutions. Use the following context to answer the user's question:";

const NO_CONTEXT: &str = "No relevant knowledge base entries were found.";

const RAG_FALLBACK: &str = "I'd be happy to help! I specialize in answering questions about Blaq Digital. \
Here are some topics I know about:\n\n\
**Services & Solutions**\n\u{2022} AI chatbots and RAG systems\n\u{2022} Web development and AI integration\n\u{2022} Conversational media platforms\n\n\
**Project Details**\n\u{2022} Pricing and timelines\n\u{2022} Development approach\n\u{2022} How to get started\n\n\
What would you like to know more about?";

const CHATBOT_FALLBACK: &str = "I'm Cody, Blaq Digital's AI assistant! I'm here to help answer your questions \
about our AI development services, RAG chatbot solutions, and web development offerings.\n\n\
Feel free to ask me about:\n\u{2022} Our services and capabilities\n\u{2022} Project pricing and timelines\n\
\u{2022} How RAG technology works\n\u{2022} Getting started with a project\n\n\
What can I help you with today?";

/// Canned answer used when the completion service can't produce one
pub fn fallback_reply(kind: MessageType) -> &'static str {
    match kind {
        MessageType::Rag => RAG_FALLBACK,
        MessageType::Chatbot => CHATBOT_FALLBACK,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub has_relevant_content: bool,
    pub sources: Vec<SearchHit>,
}

/// Knowledge search, then completion, then memory. Each step waits for the one
/// before it; only the completion result decides what the user sees.
pub struct ChatResponder<'a> {
    pub knowledge: &'a dyn KnowledgeStore,
    pub completion: &'a dyn ChatCompletion,
    pub collection: &'a str,
    pub top_k: usize,
}

impl ChatResponder<'_> {
    pub async fn respond(&self, session_id: &str, message: &str, kind: MessageType) -> ChatReply {
        let sources = match self
            .knowledge
            .search_similar_text(self.collection, message, self.top_k)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, session_id, "Knowledge search failed, answering without context");
                Vec::new()
            }
        };

        let context = build_context(&sources);
        let messages = [
            ChatMessage::system(format!("{SYSTEM_PROMPT}\n\n{context}")),
            ChatMessage::user(message),
        ];

        let reply = match self.completion.complete(&messages).await {
            Ok(text) => ChatReply {
                has_relevant_content: !sources.is_empty(),
                response: text,
                sources,
            },
            Err(e) => {
                tracing::warn!(error = %e, session_id, "Chat completion failed, using fallback reply");
                ChatReply {
                    response: fallback_reply(kind).to_string(),
                    has_relevant_content: false,
                    sources,
                }
            }
        };

        let entry = MemoryEntry {
            session_id: session_id.to_string(),
            message: message.to_string(),
            response: reply.response.clone(),
            message_type: kind.as_str().to_string(),
        };
        if let Err(e) = self.knowledge.store_memory(&entry).await {
            tracing::warn!(error = %e, session_id, "Failed to store conversation memory");
        }

        reply
    }
}

fn build_context(sources: &[SearchHit]) -> String {
    let passages: Vec<&str> = sources.iter().filter_map(|hit| hit.text.as_deref()).collect();
    if passages.is_empty() {
        NO_CONTEXT.to_string()
    } else {
        passages.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(text: Option<&str>) -> SearchHit {
        SearchHit {
            id: "doc".to_string(),
            score: 0.9,
            text: text.map(str::to_string),
            metadata: None,
        }
    }

    #[test]
    fn context_joins_passages() {
        let context = build_context(&[hit(Some("RAG systems")), hit(None), hit(Some("Chatbots"))]);
        assert_eq!(context, "RAG systems\n\nChatbots");
        assert_eq!(build_context(&[]), NO_CONTEXT);
    }

    #[test]
    fn fallback_depends_on_kind() {
        assert!(fallback_reply(MessageType::Rag).contains("What would you like to know more about?"));
        assert!(fallback_reply(MessageType::Chatbot).starts_with("I'm Cody"));
    }
}
