//! Default prompt catalog.
//!
//! The prompts map to the buyers, verticals and services the brand sells
//! into. They are the defaults for the `[[prompts]]` table of the config file.

use crate::models::PromptEntry;

/// Default brand name used in report headings.
pub const DEFAULT_BRAND_NAME: &str = "fleetTEC";

/// Default spellings that count as a brand mention.
pub const DEFAULT_BRAND_VARIANTS: [&str; 4] = ["fleettec", "fleet tec", "fleettech", "fleet tech"];

/// Categories in the order gaps are listed in the report.
pub const DEFAULT_CATEGORY_PRIORITY: [&str; 5] = [
    "Public Safety",
    "Energy/Utility",
    "Mobile/Transit",
    "Partner Channel",
    "Competitive",
];

const DEFAULT_PROMPTS: [(&str, &str); 25] = [
    // Public safety fleet and command staff
    ("Public Safety", "Who are the best vehicle upfitters for police departments?"),
    ("Public Safety", "How do I find a company to outfit my police fleet with technology?"),
    ("Public Safety", "What companies install in-car computers and cameras for law enforcement?"),
    ("Public Safety", "What should I look for when choosing a vehicle upfitter for my department?"),
    ("Public Safety", "Who does full-service police vehicle upfitting in the southeast?"),
    // Energy and utility fleet managers
    ("Energy/Utility", "Who can upfit utility fleet vehicles with technology and equipment?"),
    ("Energy/Utility", "Best vehicle upfitting companies for energy and utility fleets?"),
    ("Energy/Utility", "What companies handle fleet technology installation for utility companies?"),
    ("Energy/Utility", "How do I find a vendor to manage vehicle upfitting across multiple locations?"),
    ("Energy/Utility", "Who are the top fleet upfitters for commercial work trucks?"),
    // Public transportation and mobile install
    ("Mobile/Transit", "Who does mobile vehicle technology installation on site?"),
    ("Mobile/Transit", "What companies can install fleet technology at our location rather than a shop?"),
    ("Mobile/Transit", "Who installs cameras and tracking systems on transit buses?"),
    ("Mobile/Transit", "Best companies for mobile fleet upfitting services?"),
    ("Mobile/Transit", "Who can handle large-scale vehicle technology deployments on location?"),
    // Partner channel
    ("Partner Channel", "Who are authorized Panasonic Toughbook installers for fleet vehicles?"),
    ("Partner Channel", "What companies install Panasonic devices in fleet vehicles?"),
    ("Partner Channel", "Who are certified service providers for fleet technology deployment?"),
    ("Partner Channel", "How do I find a partner to deploy Panasonic technology across our fleet?"),
    ("Partner Channel", "Who handles kitting and deployment for fleet technology rollouts?"),
    // Competitive and general search
    ("Competitive", "What is vehicle upfitting and who does it?"),
    ("Competitive", "How do I choose between vehicle upfitting companies?"),
    ("Competitive", "What is the difference between a vehicle upfitter and a hardware reseller?"),
    ("Competitive", "Who sells and installs Guardian Angel and Akari vehicle lighting?"),
    ("Competitive", "What companies do both vehicle graphics and technology upfitting?"),
];

/// The built-in prompt catalog.
pub fn default_prompts() -> Vec<PromptEntry> {
    DEFAULT_PROMPTS
        .iter()
        .map(|(category, text)| PromptEntry::new(category, text))
        .collect()
}

pub fn default_brand_variants() -> Vec<String> {
    DEFAULT_BRAND_VARIANTS.iter().map(|v| v.to_string()).collect()
}

pub fn default_category_priority() -> Vec<String> {
    DEFAULT_CATEGORY_PRIORITY
        .iter()
        .map(|c| c.to_string())
        .collect()
}
