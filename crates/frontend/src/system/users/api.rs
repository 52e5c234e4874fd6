use contracts::system::users::ChangePasswordDto;

use crate::shared::api_client::{self, ApiError};

/// Change the password of the given user. The server answers 204.
pub async fn change_password(dto: &ChangePasswordDto) -> Result<(), ApiError> {
    api_client::post_no_content(
        &format!("/api/system/users/{}/change-password", dto.user_id),
        dto,
    )
    .await
}
