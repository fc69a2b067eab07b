use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AclError>;

/// Value that is either fully validated or carries every failure found while
/// building it.
pub type Validated<T> = std::result::Result<T, ValidationErrors>;

#[derive(Error, Debug)]
pub enum AclError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("{0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for AclError {
    fn from(errors: ValidationErrors) -> Self {
        AclError::Validation(errors)
    }
}

impl From<ValidationError> for AclError {
    fn from(error: ValidationError) -> Self {
        AclError::Validation(ValidationErrors::from(error))
    }
}

/// A single input or validation failure. These are collected rather than
/// returned one at a time so that a user sees every problem in one pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("must set exactly one of: cluster-scope, consumer-group, topic, transactional-id")]
    ResourceSelector,

    #[error("invalid operation \"{token}\": valid operations are: {valid}")]
    InvalidOperation { token: String, valid: String },

    #[error("a filter takes a single operation, got \"{0}\"")]
    MultipleOperations(String),

    #[error("invalid resource type \"{token}\": valid resource types are: {valid}")]
    InvalidResourceType { token: String, valid: String },

    #[error("invalid pattern type \"{token}\": valid pattern types are: {valid}")]
    InvalidPatternType { token: String, valid: String },

    #[error("invalid permission \"{token}\": valid permissions are: {valid}")]
    InvalidPermission { token: String, valid: String },

    #[error("malformed principal \"{principal}\": {reason}")]
    MalformedPrincipal { principal: String, reason: String },

    #[error("principal \"{0}\" not found")]
    PrincipalNotFound(String),

    #[error("cannot set both service account and principal")]
    ConflictingPrincipal,

    #[error("must set either a service account or a principal")]
    MissingPrincipal,

    #[error("must set exactly one of: allow, deny")]
    ConflictingPermission,

    #[error("must set allow or deny")]
    MissingPermission,

    #[error("must set a resource type")]
    MissingResourceType,

    #[error("{0} name must not be empty")]
    EmptyResourceName(String),

    #[error("prefix requires one of: consumer-group, topic, transactional-id")]
    PrefixWithoutResource,
}

impl ValidationError {
    /// Errors raised while turning the principal input into an identity.
    pub fn is_principal_error(&self) -> bool {
        matches!(
            self,
            ValidationError::MalformedPrincipal { .. }
                | ValidationError::PrincipalNotFound(_)
                | ValidationError::ConflictingPrincipal
                | ValidationError::MissingPrincipal
        )
    }

    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            ValidationError::ConflictingPermission | ValidationError::MissingPermission
        )
    }

    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            ValidationError::ResourceSelector
                | ValidationError::MissingResourceType
                | ValidationError::EmptyResourceName(_)
                | ValidationError::PrefixWithoutResource
        )
    }
}

/// Ordered list of validation failures. Failures are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Concatenate `other` onto the end of this list.
    pub fn append(&mut self, mut other: ValidationErrors) {
        self.errors.append(&mut other.errors);
    }

    /// Concatenate `other`, skipping failures already present.
    pub fn merge(&mut self, other: &ValidationErrors) {
        for error in &other.errors {
            if !self.errors.contains(error) {
                self.errors.push(error.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.errors.contains(error)
    }

    pub fn any(&self, predicate: impl Fn(&ValidationError) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }

    /// Return `value` if nothing was recorded, otherwise every recorded failure.
    pub fn into_result<T>(self, value: T) -> Validated<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => write!(f, "no validation errors"),
            1 => write!(f, "{}", self.errors[0]),
            n => {
                write!(f, "{} errors occurred:", n)?;
                for error in &self.errors {
                    write!(f, "\n\t* {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}
