//! Grounding prompt construction.
//!
//! The instruction pins the model to the supplied context: answer only
//! from it, decline when it is not enough, plain language, cite sources.
//! The assistant speaks Spanish because the corpus and its users do.

/// Delimiter between retrieved fragments inside the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Canonical answer when retrieval finds nothing relevant. Returned
/// without spending a model call.
pub const NO_INFORMATION_ANSWER: &str = "Lo siento, no dispongo de esa información específica en \
     los documentos disponibles. Te recomiendo consultar directamente con los servicios sociales \
     de tu municipio.";

const SYSTEM_INSTRUCTION: &str = "Eres un asistente experto en trámites administrativos para \
     familias con miembros con autismo en Andalucía. Tu tarea es responder a la pregunta del \
     usuario basándote ÚNICAMENTE en el contexto proporcionado. Si la respuesta no está en el \
     contexto, indica amablemente que no tienes esa información específica. Responde de forma \
     clara, concisa y en un lenguaje sencillo para las familias. Al final de tu respuesta, lista \
     las fuentes (documentos) utilizadas.";

/// Join retrieved fragment texts, already in descending relevance order.
pub fn compose_context<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts.into_iter().collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Full single-turn prompt: instruction + question + context.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "{SYSTEM_INSTRUCTION}\n\nPregunta: {question}\n\nContexto relevante:\n---\n{context}\n---\n"
    )
}
