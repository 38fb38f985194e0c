use database::user::model::{User, UserRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 对外的用户视图：永不携带 credentialKey
#[derive(Clone, Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub balance: f64,
    pub is_active: bool,
    pub referral_code: String,
    pub referrer_id: String,
    pub role: UserRole,
    pub joined_at: u64,
}

impl From<User> for UserProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
            balance: user.balance,
            is_active: user.is_active,
            referral_code: user.referral_code,
            referrer_id: user.referrer_id,
            role: user.role,
            joined_at: user.joined_at,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, message = "Name must not be empty."))]
    pub name: String,
}

#[derive(Clone, Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponseDto {
    pub total: usize,
    pub active: usize,
    pub members: Vec<UserProfileDto>,
}

impl TeamResponseDto {
    pub fn from_members(members: Vec<User>) -> Self {
        let active = members.iter().filter(|m| m.is_active).count();
        Self {
            total: members.len(),
            active,
            members: members.into_iter().map(UserProfileDto::from).collect(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivationDto {
    #[validate(range(min = 1.0, message = "Amount must be at least 1."))]
    pub amount: f64,

    #[validate(length(min = 1))]
    pub method: String,

    #[validate(length(min = 1))]
    pub trx_id: String,

    #[validate(length(min = 1))]
    pub mobile_number: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawalDto {
    #[validate(range(min = 1.0, message = "Amount must be at least 1."))]
    pub amount: f64,

    #[validate(length(min = 1))]
    pub method: String,

    #[validate(length(min = 1))]
    pub mobile_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dto_drops_credential_key() {
        let user = User {
            id: "MP12345".to_string(),
            credential_key: "top-secret".to_string(),
            name: "Member 12345".to_string(),
            email: String::new(),
            phone: String::new(),
            avatar: String::new(),
            balance: 10.0,
            is_active: false,
            referral_code: "ABC123".to_string(),
            referrer_id: "ADMIN".to_string(),
            role: UserRole::User,
            joined_at: 0,
        };

        let json = serde_json::to_string(&UserProfileDto::from(user)).unwrap();
        assert!(!json.contains("top-secret"));
        assert!(!json.contains("credentialKey"));
        assert!(json.contains("\"referralCode\":\"ABC123\""));
    }

    #[test]
    fn test_activation_dto_validation() {
        let valid = CreateActivationDto {
            amount: 500.0,
            method: "bkash".to_string(),
            trx_id: "TRX9A".to_string(),
            mobile_number: "01700000000".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateActivationDto {
            amount: 0.0,
            trx_id: String::new(),
            ..valid
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_team_counts_active_members() {
        let a = User {
            id: "MP00001".to_string(),
            credential_key: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            avatar: String::new(),
            balance: 0.0,
            is_active: true,
            referral_code: "A".to_string(),
            referrer_id: "R".to_string(),
            role: UserRole::User,
            joined_at: 0,
        };
        let mut b = a.clone();
        b.id = "MP00002".to_string();
        b.is_active = false;

        let team = TeamResponseDto::from_members(vec![a, b]);
        assert_eq!(team.total, 2);
        assert_eq!(team.active, 1);
    }
}
