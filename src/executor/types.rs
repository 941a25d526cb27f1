use serde::Deserialize;

/// What came back from one execution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResponse {
    /// HTTP status code of the response.
    pub status: u16,
    /// The text to show in the output pane.
    pub output: String,
}

/// JSON body returned by the execution endpoint.
///
/// Normal responses carry `output`. The service answers an empty
/// submission with `{"error": "..."}` instead.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct ResponseBody {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ResponseBody {
    /// Returns the displayable text: `output` first, then `error`.
    pub fn into_text(self) -> Option<String> {
        self.output.or(self.error)
    }
}
