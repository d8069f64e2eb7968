//! Synthetic product records for when real extraction is unavailable

use rand::Rng;
use tracing::info;

use crate::models::{Platform, ProductRecord};

/// One entry of a platform's example table
#[derive(Debug)]
struct MockProduct {
    name: &'static str,
    price: f64,
    original_price: f64,
    image_url: &'static str,
    description: &'static str,
    category: &'static str,
    rating: f64,
    brand: &'static str,
}

static AMAZON_MOCKS: [MockProduct; 3] = [
    MockProduct {
        name: "אוזניות Bluetooth אלחוטיות מקצועיות",
        price: 89.99,
        original_price: 149.99,
        image_url: "https://images.unsplash.com/photo-1590658268037-6bf12165a8df?w=400&h=400&fit=crop",
        description: "אוזניות אלחוטיות איכותיות עם ביטול רעש אקטיבי, איכות צליל מעולה וסוללה ארוכת מחזיק. מושלמות לאוהבי מוסיקה ואנשי מקצוע.",
        category: "Electronics",
        rating: 4.5,
        brand: "TechSound Pro",
    },
    MockProduct {
        name: "Smart Home Security Camera System 1080p",
        price: 179.99,
        original_price: 249.99,
        image_url: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400&h=400&fit=crop",
        description: "מערכת מצלמות אבטחה חכמות HD עם ראיית לילה, זיהוי תנועה והתראות לסמארטפון. התקנה קלה ואמינות גבוהה.",
        category: "Home Security",
        rating: 4.3,
        brand: "SecureHome",
    },
    MockProduct {
        name: "Wireless Earbuds with Charging Case",
        price: 89.99,
        original_price: 129.99,
        image_url: "https://images.unsplash.com/photo-1606841837239-c5a1a4a07af7?w=400&h=400&fit=crop",
        description: "High-quality wireless earbuds with noise cancellation and long battery life.",
        category: "Electronics",
        rating: 4.5,
        brand: "SoundCore",
    },
];

static ALIEXPRESS_MOCKS: [MockProduct; 3] = [
    MockProduct {
        name: "עכבר גיימינג RGB עם דיוק גבוה",
        price: 59.99,
        original_price: 99.99,
        image_url: "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=400&h=400&fit=crop",
        description: "עכבר גיימינג מקצועי עם תאורת RGB מותאמת אישית, חיישן אופטי דיוק גבוה ועיצוב ארגונומי למשחק ממושך.",
        category: "Gaming",
        rating: 4.2,
        brand: "GameTech Pro",
    },
    MockProduct {
        name: "LED Strip Lights Kit with Remote Control",
        price: 39.99,
        original_price: 69.99,
        image_url: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400&h=400&fit=crop",
        description: "רצועות LED חכמות עם שליטה מרחוק, סנכרון מוסיקה ו-16 מיליון צבעים. מושלם לעיצוב חדרים ותאורה אמביינטית.",
        category: "Home Decor",
        rating: 4.4,
        brand: "LightUp",
    },
    MockProduct {
        name: "Fitness Smart Watch with Heart Rate Monitor",
        price: 45.99,
        original_price: 89.99,
        image_url: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400&h=400&fit=crop",
        description: "Feature-rich smartwatch with fitness tracking and heart rate monitoring.",
        category: "Wearables",
        rating: 4.2,
        brand: "FitPulse",
    },
];

static EBAY_MOCKS: [MockProduct; 3] = [
    MockProduct {
        name: "שעון יד בסגנון וינטג' עם רצועת עור",
        price: 129.99,
        original_price: 189.99,
        image_url: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400&h=400&fit=crop",
        description: "שעון יד קלאסי בסגנון וינטג' עם רצועת עור אמיתית, מנגנון קוורץ מדויק ועיצוב עמיד במים לשימוש יומיומי.",
        category: "Fashion",
        rating: 4.1,
        brand: "TimeClassic",
    },
    MockProduct {
        name: "Professional Tool Set with Case - 120 Pieces",
        price: 199.99,
        original_price: 299.99,
        image_url: "https://images.unsplash.com/photo-1530587191325-3db32d826c18?w=400&h=400&fit=crop",
        description: "ערכת כלים מקצועית מלאה עם כלים באיכות גבוהה, תיק נשיאה מאורגן ואחריות מלאה. מושלם למקצוענים וחובבים.",
        category: "Tools",
        rating: 4.6,
        brand: "ProTools Master",
    },
    MockProduct {
        name: "Vintage Film Camera with Leather Case",
        price: 199.99,
        original_price: 299.99,
        image_url: "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=400&h=400&fit=crop",
        description: "Classic vintage camera in excellent condition with original leather case.",
        category: "Cameras",
        rating: 4.8,
        brand: "RetroLens",
    },
];

fn mocks_for(platform: Platform) -> &'static [MockProduct; 3] {
    match platform {
        Platform::Amazon => &AMAZON_MOCKS,
        Platform::AliExpress => &ALIEXPRESS_MOCKS,
        Platform::Ebay => &EBAY_MOCKS,
    }
}

/// A realistic record drawn uniformly from the platform's example table.
/// Never fails and performs no I/O.
pub fn generate_mock(platform: Platform) -> ProductRecord {
    let table = mocks_for(platform);
    let mock = &table[rand::thread_rng().gen_range(0..table.len())];

    info!("Generating fallback product for {}: {}", platform, mock.name);

    ProductRecord {
        name: mock.name.to_string(),
        price: mock.price,
        original_price: Some(mock.original_price),
        image_url: mock.image_url.to_string(),
        description: mock.description.to_string(),
        category: mock.category.to_string(),
        platform,
        rating: Some(mock.rating),
        brand: Some(mock.brand.to_string()),
        discount: None,
    }
    .with_discount()
}
