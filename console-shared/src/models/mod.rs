pub mod auth;
pub mod envelope;
pub mod issue;
pub mod system;
pub mod theme;
pub mod user;

pub use auth::{
    AuthMethod, AuthToken, LdapLoginRequest, LoginRequest, LoginResponse, OAuthCallbackParams,
    RefreshTokenResponse, RegisterRequest, RegisterResponse,
};
pub use envelope::{Envelope, SUCCESS_CODE};
pub use issue::{CreateIssueRequest, CreateIssueResponse};
pub use system::{PluginVersion, VersionInfo};
pub use theme::Theme;
pub use user::{
    AvatarUploadResponse, DEFAULT_ROLE, InviteUserRequest, LogoutResponse, UpdateUserRequest,
    UserInfo,
};
