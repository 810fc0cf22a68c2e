//! Built-in content used when nothing has been persisted yet.

use std::collections::BTreeSet;

use bistro_core::{
    AboutSection, AnnouncementBar, CartLabels, Category, CategoryId, ContactDetails,
    DesignSettings, Dish, DishId, DishTag, FeatureCallout, GalleryImage, GalleryImageId,
    HeroSection, NewsletterCopy, Price, SiteContent, Slug, Testimonial, TestimonialId,
};

use super::SiteState;

/// The aggregate a fresh install starts from.
#[must_use]
pub fn site_state() -> SiteState {
    SiteState {
        site_content: site_content(),
        dishes: dishes(),
        categories: categories(),
        gallery: gallery(),
        testimonials: testimonials(),
        design: DesignSettings {
            featured_category_id: Some(CategoryId::new("cat-mains")),
            ..DesignSettings::default()
        },
    }
}

fn site_content() -> SiteContent {
    SiteContent {
        restaurant_name: "Bistro".to_string(),
        tagline: "Seasonal plates, cooked to order".to_string(),
        currency_symbol: "$".to_string(),
        hero: HeroSection {
            title: "Welcome to Bistro".to_string(),
            subtitle: "Fresh food from a small kitchen, delivered or ready for pickup".to_string(),
            background_image: "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4"
                .to_string(),
            cta_label: "See the menu".to_string(),
            ..HeroSection::default()
        },
        about: AboutSection {
            title: "Our story".to_string(),
            body: "We opened our doors with six tables and a wood oven. The menu follows \
                   the market and changes with the seasons."
                .to_string(),
            image: String::new(),
        },
        contact: ContactDetails {
            phone: "+1 (555) 010-2030".to_string(),
            whatsapp: "+1 555 010 2030".to_string(),
            email: "hello@bistro.example".to_string(),
            address: "12 Market Street".to_string(),
            opening_hours: "Tue-Sun 12:00-22:00".to_string(),
        },
        cart: CartLabels::default(),
        announcement: AnnouncementBar {
            enabled: true,
            text: "Free delivery on orders over $40".to_string(),
            ..AnnouncementBar::default()
        },
        features: vec![
            FeatureCallout {
                icon: "leaf".to_string(),
                title: "Local produce".to_string(),
                description: "Vegetables from farms within fifty miles.".to_string(),
            },
            FeatureCallout {
                icon: "flame".to_string(),
                title: "Wood-fired".to_string(),
                description: "Breads and mains from our oven.".to_string(),
            },
            FeatureCallout {
                icon: "bike".to_string(),
                title: "Fast delivery".to_string(),
                description: "Hot to your door in under forty minutes.".to_string(),
            },
        ],
        newsletter: NewsletterCopy {
            title: "Stay in the loop".to_string(),
            description: "New dishes and events, straight to your phone.".to_string(),
            button_label: "Subscribe".to_string(),
        },
    }
}

fn category(id: &str, name: &str, description: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: Slug::from_name(name),
        description: description.to_string(),
        image: String::new(),
    }
}

fn categories() -> Vec<Category> {
    vec![
        category("cat-starters", "Starters", "Small plates to share"),
        category("cat-mains", "Mains", "From the oven and the grill"),
        category("cat-desserts", "Desserts", "Made in house every morning"),
        category("cat-drinks", "Drinks", "Soft drinks, juices and coffee"),
    ]
}

fn dish(
    id: &str,
    name: &str,
    short_description: &str,
    cents: u32,
    category_id: &str,
    tags: &[DishTag],
) -> Dish {
    Dish {
        id: DishId::new(id),
        name: name.to_string(),
        short_description: short_description.to_string(),
        description: String::new(),
        price: Price::from_cents(cents),
        images: Vec::new(),
        category_id: CategoryId::new(category_id),
        available: true,
        tags: tags.iter().copied().collect::<BTreeSet<_>>(),
    }
}

fn dishes() -> Vec<Dish> {
    vec![
        dish(
            "dish-1",
            "Bruschetta",
            "Grilled bread, tomato, basil",
            750,
            "cat-starters",
            &[DishTag::Vegetarian],
        ),
        dish(
            "dish-2",
            "Chili Calamari",
            "Crispy squid, chili mayo",
            1100,
            "cat-starters",
            &[DishTag::Spicy],
        ),
        dish(
            "dish-3",
            "Wood-fired Chicken",
            "Half chicken, lemon, herbs",
            1850,
            "cat-mains",
            &[DishTag::Recommended],
        ),
        dish(
            "dish-4",
            "Mushroom Risotto",
            "Arborio, porcini, parmesan",
            1600,
            "cat-mains",
            &[DishTag::Vegetarian, DishTag::New],
        ),
        dish(
            "dish-5",
            "Chocolate Tart",
            "Dark chocolate, sea salt",
            800,
            "cat-desserts",
            &[],
        ),
        dish(
            "dish-6",
            "Fresh Lemonade",
            "Lemons, mint, cane sugar",
            450,
            "cat-drinks",
            &[],
        ),
    ]
}

fn gallery() -> Vec<GalleryImage> {
    vec![
        GalleryImage {
            id: GalleryImageId::new("gallery-1"),
            image: "https://images.unsplash.com/photo-1414235077428-338989a2e8c0".to_string(),
            alt: "Dining room".to_string(),
        },
        GalleryImage {
            id: GalleryImageId::new("gallery-2"),
            image: "https://images.unsplash.com/photo-1559339352-11d035aa65de".to_string(),
            alt: "The kitchen pass".to_string(),
        },
    ]
}

fn testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            id: TestimonialId::new("testimonial-1"),
            author: "Maria G.".to_string(),
            quote: "The risotto alone is worth the trip.".to_string(),
        },
        Testimonial {
            id: TestimonialId::new("testimonial-2"),
            author: "Daniel K.".to_string(),
            quote: "Ordered for pickup, ready in fifteen minutes and still hot.".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_dish_has_a_category() {
        let state = site_state();
        for dish in &state.dishes {
            assert!(state.category_for(dish).is_some(), "{} is orphaned", dish.name);
        }
        assert!(state.featured_category().is_some());
    }

    #[test]
    fn test_default_slugs() {
        let state = site_state();
        assert!(state.category_by_slug("desserts").is_some());
        assert_eq!(
            state.dishes_in(&CategoryId::new("cat-mains")).count(),
            2
        );
    }
}
