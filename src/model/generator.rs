use log::{error, info};
use std::sync::Arc;

use super::{CompletionRequest, CompletionService, Message};

pub const SYSTEM_PROMPT: &str = "You are a species and animal expert chatbot. You specialize in providing information about animals, including their habitat, diet, conservation status, behavior, and other biological facts.

You should ONLY respond to questions about animals, species, wildlife, marine life, insects, birds, mammals, reptiles, amphibians, and related biological topics.

If someone asks about anything unrelated to animals or species (like cooking, technology, politics, etc.), politely remind them that you only handle species-related queries and ask them to ask about animals instead.

Keep your responses informative but conversational, and always be helpful and engaging when discussing animal topics.";

pub const MODEL: &str = "gpt-3.5-turbo";
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

pub const FALLBACK_RESPONSE: &str = "I'm sorry, I'm having trouble connecting to my knowledge base right now. Please try asking about an animal or species again in a moment!";

/// Turns a single user message into a species-restricted answer.
///
/// Holds no per-conversation state: every call sends the same system
/// instruction followed by the one user message.
pub struct ResponseGenerator {
    service: Arc<dyn CompletionService>,
}

impl ResponseGenerator {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub fn build_request(&self, message: &str) -> CompletionRequest {
        CompletionRequest {
            model: MODEL.to_string(),
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(message)],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Never fails: any completion error is logged and replaced by
    /// [`FALLBACK_RESPONSE`].
    pub async fn generate(&self, message: &str) -> String {
        let request = self.build_request(message);

        match self.service.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error calling completion service: {}", e);
                info!("Answering with fallback response");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompletionError, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        reply: Result<&'static str, ()>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl CompletionService for Recording {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(CompletionError::EmptyCompletion),
            }
        }
    }

    fn generator(reply: Result<&'static str, ()>) -> (ResponseGenerator, Arc<Recording>) {
        let service = Arc::new(Recording {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        (ResponseGenerator::new(service.clone()), service)
    }

    #[actix_web::test]
    async fn returns_completion_text() {
        let (generator, _) = generator(Ok("Pandas are..."));
        assert_eq!(generator.generate("Tell me about pandas").await, "Pandas are...");
    }

    #[actix_web::test]
    async fn failure_becomes_fallback() {
        let (generator, service) = generator(Err(()));
        assert_eq!(generator.generate("hello").await, FALLBACK_RESPONSE);
        assert_eq!(generator.generate("hello again").await, FALLBACK_RESPONSE);
        assert_eq!(service.seen.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn request_is_system_then_user_with_fixed_params() {
        let (generator, service) = generator(Ok("ok"));
        generator.generate("What do koalas eat?").await;

        let seen = service.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.max_tokens, 500);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "What do koalas eat?");
    }

    #[actix_web::test]
    async fn calls_do_not_share_state() {
        let (generator, service) = generator(Ok("ok"));
        generator.generate("first question").await;
        generator.generate("second question").await;

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], generator.build_request("second question"));
        assert_eq!(seen[1].messages.len(), 2);
        assert!(seen[1].messages.iter().all(|m| !m.content.contains("first question")));
    }

    #[actix_web::test]
    async fn sampling_parameters_ignore_environment() {
        std::env::set_var("MAX_TOKENS", "4096");
        std::env::set_var("TEMPERATURE", "NaN");
        std::env::set_var("OPENAI_MODEL", "gpt-4");

        let (generator, service) = generator(Ok("ok"));
        generator.generate("How fast is a cheetah?").await;

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen[0].model, MODEL);
        assert_eq!(seen[0].max_tokens, 500);
        assert_eq!(seen[0].temperature, 0.7);

        let wire = serde_json::to_value(&seen[0]).unwrap();
        assert_eq!(wire["max_tokens"], 500);
        assert!(wire["temperature"].is_number());
    }
}
