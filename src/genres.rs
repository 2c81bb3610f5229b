/// A genre ready for display: positional id, localized name and artwork.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: usize,
    pub name: String,
    pub name_ru: String,
    pub image: String,
    pub slug: String,
}

/// Turns the backend's flat slug list into display genres. Ids are `1..=n` in
/// input order; duplicates and unknown slugs are kept as they are.
pub fn format_genres<S: AsRef<str>>(slugs: &[S], asset_base: &str) -> Vec<Genre> {
    slugs
        .iter()
        .enumerate()
        .map(|(index, slug)| {
            let slug = slug.as_ref();

            Genre {
                id: index + 1,
                name: slug.to_string(),
                name_ru: localized_name(slug).unwrap_or(slug).to_string(),
                image: artwork(slug)
                    .map(|path| asset_path(asset_base, path))
                    .unwrap_or_default(),
                slug: slug.to_string(),
            }
        })
        .collect()
}

fn localized_name(slug: &str) -> Option<&'static str> {
    let name = match slug {
        "action" => "Боевик",
        "comedy" => "Комедия",
        "drama" => "Драма",
        "horror" => "Ужасы",
        "fantasy" => "Фэнтези",
        "scifi" => "Научная фантастика",
        "romance" => "Мелодрама",
        "thriller" => "Триллер",
        "mystery" => "Детектив",
        "animation" => "Анимация",
        "adventure" => "Приключения",
        "crime" => "Криминал",
        "documentary" => "Документальный",
        "family" => "Семейный",
        "history" => "Исторический",
        "music" => "Музыкальный",
        "war" => "Военный",
        "western" => "Вестерн",
        "tv-movie" => "Телевизионный",
        "stand-up" => "Стендап",
        _ => return None,
    };

    Some(name)
}

fn artwork(slug: &str) -> Option<&'static str> {
    let path = match slug {
        "action" => "images/genres/action.jpg",
        "comedy" => "images/genres/comedy.jpg",
        "drama" => "images/genres/drama.webp",
        "horror" => "images/genres/horror.png",
        "fantasy" => "images/genres/fantasy.jpg",
        "scifi" => "images/genres/sci-fi.jpg",
        "romance" => "images/genres/romance.jpg",
        "thriller" => "images/genres/thriller.jpg",
        "mystery" => "images/genres/detective.jpg",
        "animation" => "images/genres/animation.webp",
        "adventure" => "images/genres/adventure.jpg",
        "crime" => "images/genres/crime.jpg",
        "documentary" => "images/genres/documentary.jpg",
        "family" => "images/genres/family.jpg",
        "history" => "images/genres/history.jpg",
        "music" => "images/genres/musical.jpg",
        "war" => "images/genres/war.jpg",
        "western" => "images/genres/western.jpg",
        "tv-movie" => "images/genres/tv-show.jpg",
        "stand-up" => "images/genres/stand-up.jpg",
        _ => return None,
    };

    Some(path)
}

/// Joins `path` onto `base` with exactly one `/` between them.
pub fn asset_path(base: &str, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    let base = base.strip_suffix('/').unwrap_or(base);

    format!("{}/{}", base, path)
}
