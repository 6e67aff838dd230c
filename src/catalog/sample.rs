use super::record::{ApiRecord, Cors};

const SAMPLE: &[(&str, &str, &str, &str, Cors, &str)] = &[
    (
        "OpenWeatherMap",
        "Weather data and forecasts for any location",
        "Weather",
        "apiKey",
        Cors::Unknown,
        "https://openweathermap.org/api",
    ),
    (
        "NASA",
        "NASA data including astronomy pictures and Mars rover photos",
        "Science",
        "apiKey",
        Cors::No,
        "https://api.nasa.gov",
    ),
    (
        "Random User",
        "Generate random user data for testing",
        "Development",
        "No",
        Cors::Yes,
        "https://randomuser.me",
    ),
    (
        "Cat Facts",
        "Daily cat facts and cat pictures",
        "Animals",
        "No",
        Cors::No,
        "https://catfacts.com/api",
    ),
    (
        "Dog API",
        "Dog images by breed",
        "Animals",
        "No",
        Cors::Yes,
        "https://dog.ceo/dog-api",
    ),
    (
        "REST Countries",
        "Country information including flags and currencies",
        "Open Data",
        "No",
        Cors::Yes,
        "https://restcountries.com",
    ),
    (
        "IP API",
        "IP geolocation and information",
        "Development",
        "No",
        Cors::Yes,
        "https://ip-api.com",
    ),
    (
        "GitHub",
        "Repository and user data from GitHub",
        "Development",
        "OAuth",
        Cors::Yes,
        "https://docs.github.com/en/rest",
    ),
    (
        "Quotes",
        "Inspirational and random quotes",
        "Personality",
        "No",
        Cors::Unknown,
        "https://quotes.rest",
    ),
    (
        "Unsplash",
        "High quality free stock photos",
        "Photography",
        "apiKey",
        Cors::Unknown,
        "https://unsplash.com/developers",
    ),
    (
        "News API",
        "News articles and headlines",
        "News",
        "apiKey",
        Cors::Yes,
        "https://newsapi.org",
    ),
    (
        "OpenAI",
        "AI language models and completions",
        "Machine Learning",
        "apiKey",
        Cors::Yes,
        "https://platform.openai.com",
    ),
];

/// Built-in records used when no catalog file is present.
pub fn sample_records() -> Vec<ApiRecord> {
    SAMPLE
        .iter()
        .map(|(name, description, category, auth, cors, link)| ApiRecord {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            auth: auth.to_string(),
            https: true,
            cors: *cors,
            link: link.to_string(),
        })
        .collect()
}
