// Env values consumed when resolving request options.
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWSHTTP_TIMEOUT: &str = "AWSHTTP_TIMEOUT";
pub const AWSHTTP_VERIFY_SSL: &str = "AWSHTTP_VERIFY_SSL";

// Fallbacks applied when neither arguments nor env provide a value.
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SERVICE: &str = "execute-api";
