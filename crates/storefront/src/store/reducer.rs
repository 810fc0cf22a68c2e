//! Pure state transitions.

use super::{Action, SiteState};
use crate::collection::{remove_by_id, replace, upsert};

/// Apply `action` to `state`.
///
/// - adds append, or replace an entry that already has the same ID
/// - updates replace the entry with the same ID; unknown IDs are ignored
/// - deletes remove the entry with the ID; unknown IDs are ignored
/// - deleting a category leaves dishes that reference it untouched
/// - [`Action::Unknown`] returns the state unchanged
#[must_use]
pub fn reduce(mut state: SiteState, action: Action) -> SiteState {
    match action {
        Action::SetState { state: next } => return *next,
        Action::UpdateSiteContent { content } => state.site_content = *content,
        Action::AddDish { dish } => upsert(&mut state.dishes, dish),
        Action::UpdateDish { dish } => {
            replace(&mut state.dishes, dish);
        }
        Action::DeleteDish { id } => {
            remove_by_id(&mut state.dishes, &id);
        }
        Action::AddCategory { category } => upsert(&mut state.categories, category),
        Action::UpdateCategory { category } => {
            replace(&mut state.categories, category);
        }
        Action::DeleteCategory { id } => {
            remove_by_id(&mut state.categories, &id);
        }
        Action::AddGalleryImage { image } => upsert(&mut state.gallery, image),
        Action::DeleteGalleryImage { id } => {
            remove_by_id(&mut state.gallery, &id);
        }
        Action::AddTestimonial { testimonial } => upsert(&mut state.testimonials, testimonial),
        Action::UpdateTestimonial { testimonial } => {
            replace(&mut state.testimonials, testimonial);
        }
        Action::DeleteTestimonial { id } => {
            remove_by_id(&mut state.testimonials, &id);
        }
        Action::UpdateDesign { design } => state.design = design,
        Action::Unknown => {}
    }
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use bistro_core::{
        Category, CategoryId, DesignSettings, Dish, DishId, DishTag, GalleryImage,
        GalleryImageId, Price, Slug, Testimonial, TestimonialId,
    };

    use super::*;

    fn dish(id: &str, name: &str, category: &str) -> Dish {
        Dish {
            id: DishId::new(id),
            name: name.to_string(),
            short_description: String::new(),
            description: String::new(),
            price: Price::from_cents(1000),
            images: vec![],
            category_id: CategoryId::new(category),
            available: true,
            tags: BTreeSet::new(),
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            slug: Slug::from_name(name),
            description: String::new(),
            image: String::new(),
        }
    }

    fn apply(state: SiteState, actions: Vec<Action>) -> SiteState {
        actions.into_iter().fold(state, reduce)
    }

    #[test]
    fn test_dish_sequence() {
        let mut updated = dish("d2", "Risotto", "c1");
        updated.price = Price::from_cents(1450);
        updated.tags.insert(DishTag::Recommended);

        let state = apply(
            SiteState::default(),
            vec![
                Action::AddDish {
                    dish: dish("d1", "Soup", "c1"),
                },
                Action::AddDish {
                    dish: dish("d2", "Pasta", "c1"),
                },
                Action::AddDish {
                    dish: dish("d3", "Cake", "c2"),
                },
                Action::UpdateDish {
                    dish: updated.clone(),
                },
                Action::DeleteDish {
                    id: DishId::new("d1"),
                },
            ],
        );

        let ids: Vec<_> = state.dishes.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d3"]);
        assert_eq!(state.dish(&DishId::new("d2")), Some(&updated));
        assert_eq!(state.dish(&DishId::new("d3")).unwrap().name, "Cake");
    }

    #[test]
    fn test_add_with_existing_id_does_not_duplicate() {
        let state = apply(
            SiteState::default(),
            vec![
                Action::AddDish {
                    dish: dish("d1", "Soup", "c1"),
                },
                Action::AddDish {
                    dish: dish("d1", "Better Soup", "c1"),
                },
            ],
        );
        assert_eq!(state.dishes.len(), 1);
        assert_eq!(state.dishes[0].name, "Better Soup");
    }

    #[test]
    fn test_update_and_delete_unknown_ids_are_noops() {
        let start = apply(
            SiteState::default(),
            vec![Action::AddCategory {
                category: category("c1", "Mains"),
            }],
        );
        let after = apply(
            start.clone(),
            vec![
                Action::UpdateCategory {
                    category: category("c404", "Ghost"),
                },
                Action::DeleteCategory {
                    id: CategoryId::new("c404"),
                },
                Action::DeleteDish {
                    id: DishId::new("d404"),
                },
            ],
        );
        assert_eq!(after, start);
    }

    #[test]
    fn test_category_deletion_orphans_dishes() {
        let state = apply(
            SiteState::default(),
            vec![
                Action::AddCategory {
                    category: category("cat-1", "Starters"),
                },
                Action::AddDish {
                    dish: dish("dish-1", "Bruschetta", "cat-1"),
                },
                Action::DeleteCategory {
                    id: CategoryId::new("cat-1"),
                },
            ],
        );
        let dish = state.dish(&DishId::new("dish-1")).unwrap();
        assert_eq!(dish.category_id, CategoryId::new("cat-1"));
        assert!(state.category_for(dish).is_none());
        assert!(state.categories.is_empty());
    }

    #[test]
    fn test_gallery_and_testimonials() {
        let state = apply(
            SiteState::default(),
            vec![
                Action::AddGalleryImage {
                    image: GalleryImage {
                        id: GalleryImageId::new("g1"),
                        image: "a.jpg".into(),
                        alt: "Terrace".into(),
                    },
                },
                Action::AddGalleryImage {
                    image: GalleryImage {
                        id: GalleryImageId::new("g2"),
                        image: "b.jpg".into(),
                        alt: "Kitchen".into(),
                    },
                },
                Action::DeleteGalleryImage {
                    id: GalleryImageId::new("g1"),
                },
                Action::AddTestimonial {
                    testimonial: Testimonial {
                        id: TestimonialId::new("t1"),
                        author: "Ana".into(),
                        quote: "Lovely".into(),
                    },
                },
                Action::UpdateTestimonial {
                    testimonial: Testimonial {
                        id: TestimonialId::new("t1"),
                        author: "Ana P.".into(),
                        quote: "Lovely!".into(),
                    },
                },
            ],
        );
        assert_eq!(state.gallery.len(), 1);
        assert_eq!(state.gallery[0].alt, "Kitchen");
        assert_eq!(state.testimonials.len(), 1);
        assert_eq!(state.testimonials[0].author, "Ana P.");

        let cleared = reduce(
            state,
            Action::DeleteTestimonial {
                id: TestimonialId::new("t1"),
            },
        );
        assert!(cleared.testimonials.is_empty());
    }

    #[test]
    fn test_replace_slices() {
        let design = DesignSettings {
            theme: "rustic".into(),
            featured_category_id: Some(CategoryId::new("c1")),
            ..DesignSettings::default()
        };
        let state = reduce(
            SiteState::default(),
            Action::UpdateDesign {
                design: design.clone(),
            },
        );
        assert_eq!(state.design, design);

        let replacement = SiteState {
            dishes: vec![dish("x", "Only", "c1")],
            ..SiteState::default()
        };
        let replaced = reduce(
            state,
            Action::SetState {
                state: Box::new(replacement.clone()),
            },
        );
        assert_eq!(replaced, replacement);
    }

    #[test]
    fn test_unknown_action_returns_state_unchanged() {
        let state = apply(
            SiteState::default(),
            vec![Action::AddDish {
                dish: dish("d1", "Soup", "c1"),
            }],
        );
        assert_eq!(reduce(state.clone(), Action::Unknown), state);
    }
}
