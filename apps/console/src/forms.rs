//! # Forms
//!
//! Turns `key=value` input into create payloads, applying the structural
//! constraints a form would check before submitting.
//!
//! ## Input Syntax
//! ```text
//!   add name="Ann Lee" email=ann@example.com role=admin
//!       └──────┬─────┘ └──────────┬────────┘ └───┬────┘
//!         quoted value       bare value       optional, has a default
//! ```
//!
//! | Form    | Field       | Rule                                  | Default       |
//! |---------|-------------|---------------------------------------|---------------|
//! | user    | name        | required, ≥ 2 characters              |               |
//! | user    | email       | required, email-shaped                |               |
//! | user    | role        | admin / user / viewer                 | `user`        |
//! | product | name        | required, ≥ 2 characters              |               |
//! | product | description | required                              |               |
//! | product | price       | number ≥ 0, at most two decimals      |               |
//! | product | stock       | whole number ≥ 0                      |               |
//! | product | category    | electronics / clothing / food / other | `electronics` |
//! | product | image       | optional                              | empty         |

use std::collections::BTreeMap;

use backoffice_core::validation::{
    parse_price_cents, validate_email, validate_name, validate_price_cents, validate_required,
    validate_stock, ValidationResult,
};
use backoffice_core::{Category, NewProduct, NewUser, Role, ValidationError};

const USER_FIELDS: &[&str] = &["name", "email", "role"];
const PRODUCT_FIELDS: &[&str] = &["name", "description", "price", "stock", "category", "image"];

/// Parsed `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    fields: BTreeMap<String, String>,
}

impl FormInput {
    /// Parses whitespace-separated `key=value` pairs. Values may be wrapped
    /// in double quotes to include spaces.
    pub fn parse(input: &str) -> ValidationResult<Self> {
        let mut fields = BTreeMap::new();
        for token in tokenize(input)? {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                ValidationError::InvalidFormat {
                    field: token.clone(),
                    reason: "expected key=value".to_string(),
                }
            })?;
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return Err(ValidationError::InvalidFormat {
                    field: token.clone(),
                    reason: "missing field name".to_string(),
                });
            }
            fields.insert(key, value.to_string());
        }
        Ok(FormInput { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    fn require_known(&self, allowed: &[&str]) -> ValidationResult<()> {
        match self.fields.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(unknown) => Err(ValidationError::NotAllowed {
                field: unknown.clone(),
                allowed: allowed.iter().map(|f| f.to_string()).collect(),
            }),
            None => Ok(()),
        }
    }

    /// A field that may be blank: missing, empty and whitespace all count
    /// as absent.
    fn optional(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

fn tokenize(input: &str) -> ValidationResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(ValidationError::InvalidFormat {
            field: "input".to_string(),
            reason: "unterminated quote".to_string(),
        });
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Validates the user form. Created users are active.
pub fn parse_user(input: &FormInput) -> ValidationResult<NewUser> {
    input.require_known(USER_FIELDS)?;

    let name = validate_name("name", input.get("name").unwrap_or_default())?;
    let email = validate_email(input.get("email").unwrap_or_default())?;
    let role = match input.optional("role") {
        Some(role) => role.parse::<Role>()?,
        None => Role::default(),
    };

    Ok(NewUser {
        name,
        email,
        role,
        active: true,
    })
}

/// Validates the product form. Created products are active.
pub fn parse_product(input: &FormInput) -> ValidationResult<NewProduct> {
    input.require_known(PRODUCT_FIELDS)?;

    let name = validate_name("name", input.get("name").unwrap_or_default())?;
    let description = validate_required("description", input.get("description").unwrap_or_default())?;

    let price_cents = parse_price_cents(input.get("price").unwrap_or_default())?;
    validate_price_cents(price_cents)?;

    let stock = parse_stock(input.get("stock").unwrap_or_default())?;
    validate_stock(stock)?;

    let category = match input.optional("category") {
        Some(category) => category.parse::<Category>()?,
        None => Category::default(),
    };
    let image_url = input.optional("image").unwrap_or_default().to_string();

    Ok(NewProduct {
        name,
        description,
        price_cents,
        category,
        stock,
        image_url,
        active: true,
    })
}

fn parse_stock(input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "stock".to_string(),
        });
    }
    input.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: "stock".to_string(),
        reason: "must be a whole number".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(input: &str) -> ValidationResult<NewUser> {
        parse_user(&FormInput::parse(input)?)
    }

    fn product(input: &str) -> ValidationResult<NewProduct> {
        parse_product(&FormInput::parse(input)?)
    }

    #[test]
    fn test_quoted_values() {
        let form = FormInput::parse(r#"name="Ann Lee" email=ann@example.com"#).unwrap();
        assert_eq!(form.get("name"), Some("Ann Lee"));
        assert!(FormInput::parse(r#"name="Ann"#).is_err());
        assert!(FormInput::parse("justaword").is_err());
    }

    #[test]
    fn test_user_form_defaults() {
        let draft = user(r#"name="Ann Lee" email=ann@example.com"#).unwrap();
        assert_eq!(draft.role, Role::User);
        assert!(draft.active);
    }

    #[test]
    fn test_user_form_rules() {
        assert!(matches!(
            user("name=A email=a@example.com"),
            Err(ValidationError::TooShort { .. })
        ));
        assert!(matches!(
            user("name=Ann"),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            user("name=Ann email=not-an-email"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            user("name=Ann email=a@example.com role=root"),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            user("name=Ann email=a@example.com age=3"),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert_eq!(
            user("name=Ann email=a@example.com role=ADMIN").unwrap().role,
            Role::Admin
        );
    }

    #[test]
    fn test_product_form() {
        let draft = product(r#"name=Lamp description="LED desk lamp" price=25.99 stock=3"#).unwrap();
        assert_eq!(draft.price_cents, 2599);
        assert_eq!(draft.stock, 3);
        assert_eq!(draft.category, Category::Electronics);
        assert_eq!(draft.image_url, "");
        assert!(draft.active);

        let draft = product("name=Tea description=Green price=0 stock=0 category=food image=tea.png").unwrap();
        assert_eq!(draft.price_cents, 0);
        assert_eq!(draft.category, Category::Food);
        assert_eq!(draft.image_url, "tea.png");
    }

    #[test]
    fn test_product_form_rules() {
        assert!(matches!(
            product("name=Lamp price=1 stock=1"),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            product("name=Lamp description=x price=-1 stock=1"),
            Err(ValidationError::BelowMinimum { .. })
        ));
        assert!(matches!(
            product("name=Lamp description=x price=1 stock=-2"),
            Err(ValidationError::BelowMinimum { .. })
        ));
        assert!(matches!(
            product("name=Lamp description=x price=1 stock=2.5"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            product("name=Lamp description=x price=1 stock=2 category=toys"),
            Err(ValidationError::NotAllowed { .. })
        ));
    }
}
