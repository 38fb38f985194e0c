use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFundsDto {
    #[validate(length(min = 1, message = "User id must not be empty."))]
    pub user_id: String,

    #[validate(range(min = 0.01, message = "Amount must be positive."))]
    pub amount: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPaymentNumberDto {
    #[validate(length(min = 1, message = "Payment number must not be empty."))]
    pub number: String,
}

#[derive(Clone, Serialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNumberDto {
    pub active_payment_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_funds_dto_validation() {
        let valid = AddFundsDto {
            user_id: "MP12345".to_string(),
            amount: 100.0,
        };
        assert!(valid.validate().is_ok());

        let no_user = AddFundsDto {
            user_id: String::new(),
            amount: 100.0,
        };
        assert!(no_user.validate().is_err());

        let zero = AddFundsDto {
            user_id: "MP12345".to_string(),
            amount: 0.0,
        };
        assert!(zero.validate().is_err());
    }
}
