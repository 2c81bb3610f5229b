use fake::{
    Fake,
    faker::{internet::en::SafeEmail, lorem::en::Sentence, name::en::Name},
};
use rand::Rng;
use serde_json::{Value, json};

pub fn fake_film(id: i64, genres: Value) -> Value {
    let mut rng = rand::rng();

    json!({
        "id": id,
        "title": Sentence(1..4).fake::<String>(),
        "plot": Sentence(5..12).fake::<String>(),
        "genres": genres,
        "tmdbRating": rng.random_range(1.0..10.0),
        "releaseYear": rng.random_range(1950..2025),
        "runtime": rng.random_range(60..200),
        "posterUrl": format!("https://images.example.com/poster/{}.jpg", id),
    })
}

pub fn fake_films(ids: &[i64]) -> Value {
    Value::Array(ids.iter().map(|id| fake_film(*id, json!(["drama"]))).collect())
}

pub fn fake_user(id: i64) -> Value {
    json!({
        "id": id,
        "name": Name().fake::<String>(),
        "email": SafeEmail().fake::<String>(),
    })
}
