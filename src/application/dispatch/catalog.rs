//! Tool Catalog - 工具描述与输入 JSON Schema

use serde::Serialize;
use serde_json::{json, Value};

use super::request::ToolName;

/// 对外发布的工具描述
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// 全部工具描述
pub fn tool_catalog() -> Vec<ToolDescriptor> {
    ToolName::ALL.iter().map(|tool| describe(*tool)).collect()
}

pub fn describe(tool: ToolName) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.as_str(),
        description: description(tool),
        input_schema: input_schema(tool),
    }
}

fn description(tool: ToolName) -> &'static str {
    match tool {
        ToolName::ListVoices => "List all available ElevenLabs voices",
        ToolName::GetVoiceDetails => "Get detailed information about a specific voice",
        ToolName::ListModels => "List the speech synthesis models offered by ElevenLabs",
        ToolName::GenerateSpeech => "Convert text to speech using ElevenLabs",
        ToolName::CreateVoiceProfile => {
            "Create a reusable voice profile with specific settings (overwrites a profile with the same name)"
        }
        ToolName::GetVoiceProfile => "Get a saved voice profile by name",
        ToolName::ListVoiceProfiles => "List all saved voice profiles",
        ToolName::DeleteVoiceProfile => "Delete a saved voice profile",
        ToolName::GenerateSpeechFromProfile => "Generate speech using a saved voice profile",
        ToolName::MiaVoiceCommand => "Execute a voice command to control MIA IoT devices",
        ToolName::MiaGetStatus => "Get MIA system status with voice feedback",
    }
}

fn unit_interval(description: &str) -> Value {
    json!({
        "type": "number",
        "minimum": 0.0,
        "maximum": 1.0,
        "default": 0.5,
        "description": description
    })
}

fn empty_object() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn input_schema(tool: ToolName) -> Value {
    match tool {
        ToolName::ListVoices | ToolName::ListModels | ToolName::ListVoiceProfiles => empty_object(),
        ToolName::GetVoiceDetails => json!({
            "type": "object",
            "properties": {
                "voice_id": {"type": "string", "description": "Voice ID to get details for"}
            },
            "required": ["voice_id"]
        }),
        ToolName::GenerateSpeech => json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Text to convert to speech"},
                "voice_id": {"type": "string", "description": "Voice ID to use"},
                "model_id": {"type": "string", "description": "Model ID to use"},
                "stability": unit_interval("Voice stability (0.0-1.0)"),
                "similarity_boost": unit_interval("Similarity boost (0.0-1.0)")
            },
            "required": ["text", "voice_id"]
        }),
        ToolName::CreateVoiceProfile => json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Profile name"},
                "voice_id": {"type": "string", "description": "Voice ID to associate with profile"},
                "stability": unit_interval("Voice stability setting"),
                "similarity_boost": unit_interval("Similarity boost setting")
            },
            "required": ["name", "voice_id"]
        }),
        ToolName::GetVoiceProfile | ToolName::DeleteVoiceProfile => json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Profile name"}
            },
            "required": ["name"]
        }),
        ToolName::GenerateSpeechFromProfile => json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Text to convert to speech"},
                "profile_name": {"type": "string", "description": "Name of the voice profile to use"}
            },
            "required": ["text", "profile_name"]
        }),
        ToolName::MiaVoiceCommand => json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Voice command text (e.g., 'turn on the lights')"
                },
                "voice_profile": {
                    "type": "string",
                    "default": "default",
                    "description": "Voice profile for response"
                }
            },
            "required": ["command"]
        }),
        ToolName::MiaGetStatus => json!({
            "type": "object",
            "properties": {
                "voice_profile": {
                    "type": "string",
                    "default": "default",
                    "description": "Voice profile for status readout"
                }
            },
            "required": []
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_every_tool_once() {
        let catalog = tool_catalog();
        assert_eq!(catalog.len(), ToolName::ALL.len());

        let mut names: Vec<_> = catalog.iter().map(|t| t.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ToolName::ALL.len());
    }

    #[test]
    fn test_schemas_are_objects_with_required_list() {
        for descriptor in tool_catalog() {
            assert_eq!(descriptor.input_schema["type"], "object", "{}", descriptor.name);
            assert!(descriptor.input_schema["required"].is_array(), "{}", descriptor.name);
        }
    }

    #[test]
    fn test_descriptor_serializes_input_schema_in_camel_case() {
        let value = serde_json::to_value(describe(ToolName::GenerateSpeech)).unwrap();
        assert_eq!(value["name"], "elevenlabs_generate_speech");
        assert_eq!(value["inputSchema"]["required"], json!(["text", "voice_id"]));
    }
}
