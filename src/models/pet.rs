use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub breed: String,
    pub age: i64,
    pub size_in_centimeters: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetPatch {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<i64>,
    pub size_in_centimeters: Option<i64>,
}

impl PetPatch {
    pub fn apply(self, pet: &mut Pet) {
        if let Some(name) = self.name {
            pet.name = name;
        }
        if let Some(breed) = self.breed {
            pet.breed = breed;
        }
        if let Some(age) = self.age {
            pet.age = age;
        }
        if let Some(size) = self.size_in_centimeters {
            pet.size_in_centimeters = size;
        }
    }
}
