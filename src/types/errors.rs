use std::fmt;

// === StoreError ===

/// Errors related to the persisted key-value store.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize or deserialize the stored document.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === ResolveError ===

/// Errors related to resolving a page over the network.
#[derive(Debug)]
pub enum ResolveError {
    /// The fetch failed (connection, DNS, timeout, or a body read error).
    NetworkError(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NetworkError(msg) => write!(f, "Page fetch error: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {}

// === PanelError ===

/// Errors related to panel mutation operations.
#[derive(Debug)]
pub enum PanelError {
    /// A category with the given name already exists.
    NameExists(String),
    /// The category is protected and cannot be renamed or deleted.
    ProtectedCategory(String),
    /// The operation targets the secret category while it is locked.
    SecretLocked,
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::NameExists(name) => write!(f, "Category name already exists: {}", name),
            PanelError::ProtectedCategory(name) => {
                write!(f, "Category is protected: {}", name)
            }
            PanelError::SecretLocked => write!(f, "Secret category is locked"),
        }
    }
}

impl std::error::Error for PanelError {}

// === GuardError ===

/// Errors related to the secret-access guard.
#[derive(Debug)]
pub enum GuardError {
    /// The submitted password does not match.
    IncorrectPassword,
    /// A new password must be at least four characters.
    PasswordTooShort,
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::IncorrectPassword => write!(f, "Incorrect password"),
            GuardError::PasswordTooShort => write!(f, "Password too short"),
        }
    }
}

impl std::error::Error for GuardError {}
