use reqwest::StatusCode;

/// Errors raised while resolving, binding or invoking tools.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ToolboxError {
    /// The toolbox server URL is not an absolute HTTP(S) URL.
    #[error("invalid toolbox url {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request could not be sent or the response could not be decoded.
    #[error("toolbox request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("toolbox server error ({status}): {message}")]
    Api {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Error message from the response body.
        message: String,
    },

    /// No tool with the given name exists.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// No toolset with the given name exists.
    #[error("toolset not found: {0}")]
    ToolsetNotFound(String),

    /// The server ran the tool and reported a failure.
    #[error("tool {tool} failed: {message}")]
    Invocation {
        /// Name of the tool that failed.
        tool: String,
        /// Error reported by the server.
        message: String,
    },

    /// More positional arguments were given than the tool declares.
    #[error("tool {tool} takes {expected} parameters but {given} positional arguments were given")]
    TooManyArguments {
        /// Name of the tool being called.
        tool: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of positional arguments supplied.
        given: usize,
    },

    /// A parameter received both a positional and a named value.
    #[error("tool {tool} got multiple values for parameter {name}")]
    DuplicateArgument {
        /// Name of the tool being called.
        tool: String,
        /// Parameter bound twice.
        name: String,
    },

    /// A required parameter was left unbound.
    #[error("tool {tool} is missing required parameter {name}")]
    MissingArgument {
        /// Name of the tool being called.
        tool: String,
        /// Parameter left unbound.
        name: String,
    },

    /// A toolset already contains a tool with this name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    /// An in-process tool failed.
    #[error("tool {tool} failed: {source}")]
    Execution {
        /// Name of the tool that failed.
        tool: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
