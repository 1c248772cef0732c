pub mod artifact;
pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod operation;
pub mod preprocess;

#[cfg(test)]
mod tests;

pub const ARTIFACT_FILE_NAME: &str = "secure-properties-tool.jar";
pub const ARTIFACT_DOWNLOAD_URL: &str =
    "https://docs.mulesoft.com/mule-runtime/latest/_attachments/secure-properties-tool-j17.jar";
pub const JAVA_BINARY: &str = "java";
pub const CLASSPATH_FLAG: &str = "-cp";
pub const TOOL_MAIN_CLASS: &str = "com.mulesoft.tools.SecurePropertiesTool";
pub const TOOL_INPUT_KIND: &str = "string";
pub const USER_AGENT: &str = const_format::concatcp!("secure-props/", env!("CARGO_PKG_VERSION"));
