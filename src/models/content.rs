//! Content Document Types
//!
//! Typed shapes for the JSON documents the website renders from, one per
//! page, plus the typed update operations the CMS applies to them.
//!
//! Edits are expressed as per-shape `Update` enums applied through
//! [`ContentShape::apply`]. An update naming a section or card that does
//! not exist is rejected with `CONTENT_UPDATE_REJECTED`; there are no
//! silent no-ops.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

/// A page document the store can load, update and persist
pub trait ContentShape: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Slug the document is stored and served under
    const SLUG: &'static str;

    /// Typed edit operation for this shape
    type Update: DeserializeOwned + Send;

    fn apply(&mut self, update: Self::Update) -> AppResult<()>;
}

// ============================================
// Shared blocks
// ============================================

/// Hero banner at the top of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
}

/// One card inside a section grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A titled page section with an optional card grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// One collapsible FAQ entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

// ============================================
// Home page
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeContent {
    pub hero: Hero,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Banner line under the hero ("Together we funded 1,200 students")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_banner: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HomeUpdate {
    SetHero { hero: Hero },
    SetImpactBanner { banner: Option<String> },
    SetSectionHeading { section: usize, heading: String },
    SetSectionBody { section: usize, body: String },
    SetCard { section: usize, card: usize, value: Card },
    PushCard { section: usize, value: Card },
    RemoveCard { section: usize, card: usize },
}

impl ContentShape for HomeContent {
    const SLUG: &'static str = "home";
    type Update = HomeUpdate;

    fn apply(&mut self, update: HomeUpdate) -> AppResult<()> {
        match update {
            HomeUpdate::SetHero { hero } => self.hero = hero,
            HomeUpdate::SetImpactBanner { banner } => self.impact_banner = banner,
            HomeUpdate::SetSectionHeading { section, heading } => {
                section_mut(&mut self.sections, section)?.heading = heading;
            }
            HomeUpdate::SetSectionBody { section, body } => {
                section_mut(&mut self.sections, section)?.body = body;
            }
            HomeUpdate::SetCard { section, card, value } => {
                *card_mut(&mut self.sections, section, card)? = value;
            }
            HomeUpdate::PushCard { section, value } => {
                section_mut(&mut self.sections, section)?.cards.push(value);
            }
            HomeUpdate::RemoveCard { section, card } => {
                let cards = &mut section_mut(&mut self.sections, section)?.cards;
                if card >= cards.len() {
                    return Err(card_out_of_range(section, card, cards.len()));
                }
                cards.remove(card);
            }
        }
        Ok(())
    }
}

// ============================================
// About page
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutContent {
    pub hero: Hero,
    pub mission: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AboutUpdate {
    SetHero { hero: Hero },
    SetMission { mission: String },
    SetSection { section: usize, value: Section },
    PushSection { value: Section },
}

impl ContentShape for AboutContent {
    const SLUG: &'static str = "about";
    type Update = AboutUpdate;

    fn apply(&mut self, update: AboutUpdate) -> AppResult<()> {
        match update {
            AboutUpdate::SetHero { hero } => self.hero = hero,
            AboutUpdate::SetMission { mission } => self.mission = mission,
            AboutUpdate::SetSection { section, value } => {
                *section_mut(&mut self.sections, section)? = value;
            }
            AboutUpdate::PushSection { value } => self.sections.push(value),
        }
        Ok(())
    }
}

// ============================================
// Donate page
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonateContent {
    pub hero: Hero,
    /// Preset amounts shown as quick-select buttons
    pub suggested_amounts: Vec<f64>,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DonateUpdate {
    SetHero { hero: Hero },
    SetSuggestedAmounts { amounts: Vec<f64> },
    SetFaqEntry { entry: usize, value: FaqEntry },
    PushFaqEntry { value: FaqEntry },
    RemoveFaqEntry { entry: usize },
}

impl ContentShape for DonateContent {
    const SLUG: &'static str = "donate";
    type Update = DonateUpdate;

    fn apply(&mut self, update: DonateUpdate) -> AppResult<()> {
        match update {
            DonateUpdate::SetHero { hero } => self.hero = hero,
            DonateUpdate::SetSuggestedAmounts { amounts } => {
                if amounts.is_empty() || amounts.iter().any(|a| !a.is_finite() || *a <= 0.0) {
                    return Err(AppError::update_rejected(
                        "Suggested amounts must be a non-empty list of positive values",
                    ));
                }
                self.suggested_amounts = amounts;
            }
            DonateUpdate::SetFaqEntry { entry, value } => {
                *faq_mut(&mut self.faq, entry)? = value;
            }
            DonateUpdate::PushFaqEntry { value } => self.faq.push(value),
            DonateUpdate::RemoveFaqEntry { entry } => {
                if entry >= self.faq.len() {
                    return Err(AppError::update_rejected(format!(
                        "FAQ entry {} out of range (len {})",
                        entry,
                        self.faq.len()
                    )));
                }
                self.faq.remove(entry);
            }
        }
        Ok(())
    }
}

// ============================================
// Loans page
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoansContent {
    pub hero: Hero,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Bullet list of eligibility requirements
    pub eligibility: Vec<String>,
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LoansUpdate {
    SetHero { hero: Hero },
    SetSection { section: usize, value: Section },
    SetEligibility { requirements: Vec<String> },
    SetFaqEntry { entry: usize, value: FaqEntry },
    PushFaqEntry { value: FaqEntry },
}

impl ContentShape for LoansContent {
    const SLUG: &'static str = "loans";
    type Update = LoansUpdate;

    fn apply(&mut self, update: LoansUpdate) -> AppResult<()> {
        match update {
            LoansUpdate::SetHero { hero } => self.hero = hero,
            LoansUpdate::SetSection { section, value } => {
                *section_mut(&mut self.sections, section)? = value;
            }
            LoansUpdate::SetEligibility { requirements } => {
                if requirements.is_empty() {
                    return Err(AppError::update_rejected(
                        "Eligibility list cannot be empty",
                    ));
                }
                self.eligibility = requirements;
            }
            LoansUpdate::SetFaqEntry { entry, value } => {
                *faq_mut(&mut self.faq, entry)? = value;
            }
            LoansUpdate::PushFaqEntry { value } => self.faq.push(value),
        }
        Ok(())
    }
}

// ============================================
// Contact page
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactContent {
    pub hero: Hero,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Display string, e.g. "Mon-Fri 9:00-17:00 EAT"
    pub office_hours: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ContactUpdate {
    SetHero { hero: Hero },
    SetEmail { email: String },
    SetPhone { phone: String },
    SetAddress { address: String },
    SetOfficeHours { office_hours: String },
}

impl ContentShape for ContactContent {
    const SLUG: &'static str = "contact";
    type Update = ContactUpdate;

    fn apply(&mut self, update: ContactUpdate) -> AppResult<()> {
        match update {
            ContactUpdate::SetHero { hero } => self.hero = hero,
            ContactUpdate::SetEmail { email } => {
                if !email.contains('@') {
                    return Err(AppError::update_rejected("Contact email must contain '@'"));
                }
                self.email = email;
            }
            ContactUpdate::SetPhone { phone } => self.phone = phone,
            ContactUpdate::SetAddress { address } => self.address = address,
            ContactUpdate::SetOfficeHours { office_hours } => self.office_hours = office_hours,
        }
        Ok(())
    }
}

// ============================================
// Index helpers
// ============================================

fn section_mut(sections: &mut [Section], index: usize) -> AppResult<&mut Section> {
    let len = sections.len();
    sections
        .get_mut(index)
        .ok_or_else(|| AppError::update_rejected(format!("Section {} out of range (len {})", index, len)))
}

fn card_mut(sections: &mut [Section], section: usize, card: usize) -> AppResult<&mut Card> {
    let section_ref = section_mut(sections, section)?;
    let len = section_ref.cards.len();
    section_ref
        .cards
        .get_mut(card)
        .ok_or_else(|| card_out_of_range(section, card, len))
}

fn faq_mut(faq: &mut [FaqEntry], index: usize) -> AppResult<&mut FaqEntry> {
    let len = faq.len();
    faq.get_mut(index)
        .ok_or_else(|| AppError::update_rejected(format!("FAQ entry {} out of range (len {})", index, len)))
}

fn card_out_of_range(section: usize, card: usize, len: usize) -> AppError {
    AppError::update_rejected(format!(
        "Card {} out of range in section {} (len {})",
        card, section, len
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    fn home_fixture() -> HomeContent {
        HomeContent {
            hero: Hero {
                title: "Lasting change, one family at a time".to_string(),
                subtitle: "Education, healthcare and microloans across East Africa".to_string(),
                image: None,
                cta_label: Some("Donate".to_string()),
                cta_link: Some("/donate".to_string()),
            },
            sections: vec![Section {
                heading: "What we do".to_string(),
                body: "Three programs, one goal.".to_string(),
                cards: vec![
                    Card {
                        title: "Education".to_string(),
                        body: "School fees and supplies.".to_string(),
                        icon: None,
                    },
                    Card {
                        title: "Healthcare".to_string(),
                        body: "Clinic visits and medication.".to_string(),
                        icon: None,
                    },
                ],
            }],
            impact_banner: None,
        }
    }

    #[test]
    fn test_set_card_in_range() {
        let mut home = home_fixture();
        home.apply(HomeUpdate::SetCard {
            section: 0,
            card: 1,
            value: Card {
                title: "Microloans".to_string(),
                body: "Seed capital for small businesses.".to_string(),
                icon: None,
            },
        })
        .unwrap();

        assert_eq!(home.sections[0].cards[1].title, "Microloans");
    }

    #[test]
    fn test_card_out_of_range_is_rejected() {
        let mut home = home_fixture();
        let err = home
            .apply(HomeUpdate::SetCard {
                section: 0,
                card: 5,
                value: Card {
                    title: "x".to_string(),
                    body: "y".to_string(),
                    icon: None,
                },
            })
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ContentUpdateRejected);
        // Document unchanged
        assert_eq!(home.sections[0].cards.len(), 2);
    }

    #[test]
    fn test_section_out_of_range_is_rejected() {
        let mut home = home_fixture();
        let err = home
            .apply(HomeUpdate::SetSectionHeading {
                section: 3,
                heading: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentUpdateRejected);
    }

    #[test]
    fn test_remove_card() {
        let mut home = home_fixture();
        home.apply(HomeUpdate::RemoveCard { section: 0, card: 0 }).unwrap();
        assert_eq!(home.sections[0].cards.len(), 1);
        assert_eq!(home.sections[0].cards[0].title, "Healthcare");
    }

    #[test]
    fn test_update_deserializes_from_tagged_json() {
        let update: HomeUpdate = serde_json::from_value(serde_json::json!({
            "op": "set_section_heading",
            "section": 0,
            "heading": "Our programs"
        }))
        .unwrap();

        let mut home = home_fixture();
        home.apply(update).unwrap();
        assert_eq!(home.sections[0].heading, "Our programs");
    }

    #[test]
    fn test_donate_rejects_empty_amounts() {
        let mut donate = DonateContent {
            hero: home_fixture().hero,
            suggested_amounts: vec![10.0, 25.0, 50.0],
            faq: vec![],
        };
        let err = donate
            .apply(DonateUpdate::SetSuggestedAmounts { amounts: vec![] })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentUpdateRejected);
        assert_eq!(donate.suggested_amounts.len(), 3);
    }

    #[test]
    fn test_contact_email_must_look_like_email() {
        let mut contact = ContactContent {
            hero: home_fixture().hero,
            email: "hello@amani.org".to_string(),
            phone: "+254 700 000000".to_string(),
            address: "Nairobi, Kenya".to_string(),
            office_hours: "Mon-Fri 9:00-17:00 EAT".to_string(),
        };
        let err = contact
            .apply(ContactUpdate::SetEmail {
                email: "not-an-email".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ContentUpdateRejected);
        assert_eq!(contact.email, "hello@amani.org");
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let home = home_fixture();
        let json = serde_json::to_string(&home).unwrap();
        let back: HomeContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sections[0].cards.len(), home.sections[0].cards.len());
        assert_eq!(back.hero.title, home.hero.title);
    }
}
