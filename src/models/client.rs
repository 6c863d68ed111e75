use super::pet::Pet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub age: i64,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientWithPets {
    #[serde(flatten)]
    pub client: Client,
    pub pets: Vec<Pet>,
}

/// Fields of a client that can be overwritten, only the supplied ones are applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub age: Option<i64>,
    pub is_admin: Option<bool>,
}

impl ClientPatch {
    pub fn apply(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name;
        }
        if let Some(cpf) = self.cpf {
            client.cpf = cpf;
        }
        if let Some(age) = self.age {
            client.age = age;
        }
        if let Some(is_admin) = self.is_admin {
            client.is_admin = is_admin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_overwrites_supplied_fields() {
        let mut client = Client {
            id: 1,
            name: "Ana".into(),
            cpf: "123".into(),
            age: 30,
            is_admin: false,
        };

        let patch: ClientPatch = serde_json::from_str(r#"{"age": 31}"#).unwrap();
        patch.apply(&mut client);

        assert_eq!(client.age, 31);
        assert_eq!(client.name, "Ana");
        assert_eq!(client.cpf, "123");
        assert!(!client.is_admin);
    }

    #[test]
    fn test_client_with_pets_is_flattened() {
        let value = serde_json::to_value(ClientWithPets {
            client: Client {
                id: 2,
                cpf: "9".into(),
                ..Client::default()
            },
            pets: vec![],
        })
        .unwrap();

        assert_eq!(value["id"], 2);
        assert_eq!(value["cpf"], "9");
        assert!(value["pets"].as_array().is_some_and(|pets| pets.is_empty()));
    }
}
