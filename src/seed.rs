// Built-in mock data the app starts from. Nothing here is ever written back.
use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::community::{Author, Comment, Post};
use crate::diary::{DogProfile, HealthKind, HealthRecord};
use crate::facilities::{Category, Facility};
use crate::position::GeoPoint;
use crate::store::Id;
use crate::walk::WalkRecord;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn path(points: &[(f64, f64)]) -> Vec<GeoPoint> {
    points.iter().copied().map(GeoPoint::from).collect()
}

/// Fixed weather badge for the walk page; never fetched
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherInfo {
    pub condition: String,
    pub temperature_c: i32,
    pub humidity_pct: u8,
}

pub fn weather() -> WeatherInfo {
    WeatherInfo {
        condition: "Sunny".to_string(),
        temperature_c: 22,
        humidity_pct: 45,
    }
}

pub fn walk_history() -> Vec<WalkRecord> {
    vec![
        WalkRecord::new(
            date(2023, 4, 3),
            30,
            1.5,
            path(&[(37.5665, 126.9780), (37.5675, 126.9790), (37.5685, 126.9800)]),
        ),
        WalkRecord::new(
            date(2023, 4, 2),
            25,
            1.2,
            path(&[(37.5665, 126.9780), (37.5655, 126.9770), (37.5645, 126.9760)]),
        ),
    ]
}

pub fn dog_profile() -> DogProfile {
    DogProfile {
        name: "Mungmung".to_string(),
        breed: "Golden Retriever".to_string(),
        age: "3 years".to_string(),
        weight: "25kg".to_string(),
        photo: "https://images.unsplash.com/photo-1560743173-567a3b5658b1".to_string(),
    }
}

pub fn health_records() -> Vec<HealthRecord> {
    vec![
        HealthRecord::new(
            date(2023, 4, 1),
            HealthKind::Vaccination,
            "Fifth round of the combination vaccine done",
        ),
        HealthRecord::new(
            date(2023, 3, 15),
            HealthKind::Checkup,
            "Weight is up, diet needs adjusting",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn facility(
    name: &str,
    category: Category,
    address: &str,
    phone: &str,
    rating: f64,
    distance_km: f64,
    position: (f64, f64),
    hours: &str,
    is_favorite: bool,
) -> Facility {
    Facility {
        id: Id::UNASSIGNED,
        name: name.to_string(),
        category,
        address: address.to_string(),
        phone: phone.to_string(),
        rating,
        distance_km,
        position: position.into(),
        hours: hours.to_string(),
        is_favorite,
    }
}

pub fn facilities() -> Vec<Facility> {
    vec![
        facility(
            "24h Daengdaeng Animal Hospital",
            Category::Hospital,
            "123-45 Yeoksam-dong, Gangnam-gu, Seoul",
            "02-123-4567",
            4.5,
            0.8,
            (37.5660, 126.9784),
            "Open 24 hours",
            true,
        ),
        facility(
            "Woof Woof Grooming Salon",
            Category::Grooming,
            "234-56 Yeoksam-dong, Gangnam-gu, Seoul",
            "02-234-5678",
            4.2,
            1.2,
            (37.5670, 126.9770),
            "Weekdays 10:00 - 20:00",
            false,
        ),
        facility(
            "Daengdaeng Dog Cafe",
            Category::Cafe,
            "345-67 Yeoksam-dong, Gangnam-gu, Seoul",
            "02-345-6789",
            4.7,
            0.5,
            (37.5675, 126.9790),
            "Daily 11:00 - 22:00",
            true,
        ),
        facility(
            "Premium Pet Food Shop",
            Category::PetShop,
            "456-78 Yeoksam-dong, Gangnam-gu, Seoul",
            "02-456-7890",
            4.0,
            1.5,
            (37.5655, 126.9775),
            "Weekdays 9:00 - 18:00",
            false,
        ),
    ]
}

pub fn current_user() -> Author {
    Author::new("currentUser", "Me")
}

fn comment(author: Author, content: &str, created_at: DateTime<Local>) -> Comment {
    Comment {
        id: Id::UNASSIGNED,
        author,
        content: content.to_string(),
        created_at,
    }
}

/// Feed posts, newest first, timestamped relative to `now`
pub fn posts(now: DateTime<Local>) -> Vec<Post> {
    vec![
        Post::new(
            Author::new("user1", "PuppyMom"),
            "Choco played with other dogs at the park for the first time today! \
             He was nervous at first but settled in quickly 😊",
            now - Duration::hours(2),
        )
        .with_likes(24, false)
        .with_tags(["small breed", "pug", "dog park"])
        .with_comments(vec![comment(
            Author::new("user2", "DoggoDad"),
            "So cute! Ours loves meeting other dogs too.",
            now - Duration::hours(1),
        )]),
        Post::new(
            Author::new("user3", "GoldenLover"),
            "Got the vaccination at the vet today. So brave, didn't even whimper! Praise him please 💉",
            now - Duration::days(1),
        )
        .with_likes(42, true)
        .with_tags(["retriever", "vaccination", "health"])
        .with_comments(vec![
            comment(
                Author::new("user4", "DrPaws"),
                "Very brave! Don't forget regular checkups too 😊",
                now - Duration::hours(20),
            ),
            comment(
                Author::new("user5", "DogTrainer"),
                "Good boy! Give him lots of treats~",
                now - Duration::hours(18),
            ),
        ]),
        Post::new(
            Author::new("user6", "FirstTimeOwner"),
            "Any tips for trimming nails on a nervous pup? Mine hides under the sofa.",
            now - Duration::days(3),
        )
        .with_likes(7, false)
        .with_tags(["question", "grooming"]),
    ]
}
