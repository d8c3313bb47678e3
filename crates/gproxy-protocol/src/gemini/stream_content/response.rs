pub type StreamGenerateContentResponse = crate::gemini::generate_content::response::GenerateContentResponse;
