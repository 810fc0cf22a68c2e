//! Core types for Bistro.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the entities that make up the persisted site state.

pub mod cart;
pub mod design;
pub mod email;
pub mod guest;
pub mod id;
pub mod menu;
pub mod price;
pub mod site;
pub mod slug;

pub use cart::CartItem;
pub use design::DesignSettings;
pub use email::{Email, EmailError};
pub use guest::{ContactSubmission, GalleryImage, Subscriber, Testimonial};
pub use id::*;
pub use menu::{Category, Dish, DishTag};
pub use price::{Price, PriceError};
pub use site::{
    AboutSection, AnnouncementBar, CartLabels, ContactDetails, FeatureCallout, HeroSection,
    NewsletterCopy, SiteContent,
};
pub use slug::Slug;
