use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Read({0})")]
    Read(std::io::Error),
    #[error("Parse({0})")]
    Parse(#[from] toml::de::Error),
    #[error("InvalidOrigin({0}, {1})")]
    InvalidOrigin(axum::http::header::InvalidHeaderValue, String),
    #[error("InvalidBindAddress({0})")]
    InvalidBindAddress(String),
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("PayloadSerialisation({0})")]
    PayloadSerialisation(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("AdminNotConfigured")]
    AdminNotConfigured,
    #[error("InviteSigningNotConfigured")]
    InviteSigningNotConfigured,
    #[error("InvalidCredentials")]
    InvalidCredentials,
    #[error("InvalidPasswordHash({0})")]
    InvalidPasswordHash(argon2::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Io({0})")]
    Io(#[from] std::io::Error),
    #[error("CorruptCollection({0})")]
    CorruptCollection(serde_json::Error),
    #[error("SerialiseCollection({0})")]
    SerialiseCollection(serde_json::Error),
    #[error("Connection({0})")]
    Connection(#[from] diesel::ConnectionError),
    #[error("Insert({0})")]
    Insert(diesel::result::Error),
    #[error("Count({0})")]
    Count(diesel::result::Error),
    #[error("Migrations({0})")]
    Migrations(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Transport({0})")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("Address({0})")]
    Address(#[from] lettre::address::AddressError),
    #[error("MessageBuild({0})")]
    MessageBuild(#[from] lettre::error::Error),
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("MissingProperties({0})")]
    MissingProperties(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config({0})")]
    Config(#[from] ConfigError),
    #[error("Token({0})")]
    Token(#[from] TokenError),
    #[error("Auth({0})")]
    Auth(#[from] AuthError),
    #[error("Storage({0})")]
    Storage(#[from] StorageError),
    #[error("Notify({0})")]
    Notify(#[from] NotifyError),
    #[error("ServerBuild({0})")]
    ServerBuild(#[from] ServerBuildError),
}
