//! Built-in command set and wake phrases
//!
//! Covers page navigation, page and section scrolling, and listening control
//! in English and romanized Hindi.

use super::voice_command::{CommandLanguage, VoiceCommand};

/// Pixels scrolled by "scroll down" / "scroll up"
pub const SCROLL_STEP: i32 = 500;

/// Ids of the built-in listening control commands
pub const START_LISTENING_IDS: [&str; 2] = ["start-listening", "start-listening-hi"];
pub const STOP_LISTENING_IDS: [&str; 2] = ["stop-listening", "stop-listening-hi"];

/// Default wake phrases
pub fn default_wake_words() -> Vec<String> {
    [
        "hey beast developer",
        "hey beast",
        "beast developer",
        "hey developer",
        "hey portfolio",
        "hello portfolio",
        "portfolio listen",
        "voice control",
        "hey website",
        // Hinglish
        "hey beast developer suno",
        "beast developer suno",
        "portfolio suno",
        "website suno",
        "awaz control",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Default command table, in matching order
pub fn default_commands() -> Vec<VoiceCommand> {
    use CommandLanguage::{En, Hi};

    let mut commands = Vec::new();

    // Navigation
    commands.extend([
        VoiceCommand::route("nav-home", "go home", "/")
            .with_keywords(["home page", "navigate home", "take me home"])
            .with_description("Navigate to home page")
            .with_language(En),
        VoiceCommand::route("nav-about", "go about", "/about")
            .with_keywords(["about page", "open about", "show about"])
            .with_description("Navigate to about page")
            .with_language(En),
        VoiceCommand::route("nav-projects", "show projects", "/projects")
            .with_keywords(["open projects", "projects page", "my work"])
            .with_description("Navigate to projects page")
            .with_language(En),
        VoiceCommand::route("nav-skills", "show skills", "/skills")
            .with_keywords(["open skills", "skills page", "my skills"])
            .with_description("Navigate to skills page")
            .with_language(En),
        VoiceCommand::route("nav-contact", "open contact", "/contact")
            .with_keywords(["contact page", "get in touch", "contact me"])
            .with_description("Navigate to contact page")
            .with_language(En),
        VoiceCommand::route("nav-blog", "open blog", "/blog")
            .with_keywords(["blog page", "show blog", "articles"])
            .with_description("Navigate to blog page")
            .with_language(En),
        VoiceCommand::route("nav-analytics", "show analytics", "/analytics/visitors")
            .with_keywords(["open analytics", "visitor stats", "analytics page"])
            .with_description("Navigate to analytics page")
            .with_language(En),
        VoiceCommand::route("nav-home-hi", "ghar jao", "/")
            .with_keywords(["home jao", "ghar page"])
            .with_description("घर पेज पर जाएं")
            .with_language(Hi),
        VoiceCommand::route("nav-about-hi", "about kholo", "/about")
            .with_keywords(["mere bare mein", "about page"])
            .with_description("अबाउट पेज खोलें")
            .with_language(Hi),
        VoiceCommand::route("nav-projects-hi", "projects dikhao", "/projects")
            .with_keywords(["kaam dikhao", "projects kholo"])
            .with_description("प्रोजेक्ट्स दिखाएं")
            .with_language(Hi),
    ]);

    // Page scrolling
    commands.extend([
        VoiceCommand::scroll_by("scroll-down", "scroll down", SCROLL_STEP)
            .with_keywords(["go down", "move down", "page down"])
            .with_description("Scroll down the page")
            .with_language(En),
        VoiceCommand::scroll_by("scroll-up", "scroll up", -SCROLL_STEP)
            .with_keywords(["go up", "move up", "page up"])
            .with_description("Scroll up the page")
            .with_language(En),
        VoiceCommand::scroll("scroll-top", "go to top", "top")
            .with_keywords(["scroll to top", "top of page", "beginning"])
            .with_description("Scroll to top of page")
            .with_language(En),
        VoiceCommand::scroll("scroll-bottom", "go to bottom", "bottom")
            .with_keywords(["scroll to bottom", "end of page", "bottom"])
            .with_description("Scroll to bottom of page")
            .with_language(En),
        VoiceCommand::scroll_by("scroll-down-hi", "neeche jao", SCROLL_STEP)
            .with_keywords(["neeche scroll karo", "neeche"])
            .with_description("नीचे स्क्रॉल करें")
            .with_language(Hi),
        VoiceCommand::scroll_by("scroll-up-hi", "upar jao", -SCROLL_STEP)
            .with_keywords(["upar scroll karo", "upar"])
            .with_description("ऊपर स्क्रॉल करें")
            .with_language(Hi),
    ]);

    // Section scrolling
    commands.extend([
        VoiceCommand::scroll("scroll-hero", "go to hero", "#hero")
            .with_keywords(["show hero", "hero section"])
            .with_description("Scroll to hero section")
            .with_language(En),
        VoiceCommand::scroll("scroll-about-section", "go to about section", "#about")
            .with_keywords(["about section", "scroll to about"])
            .with_description("Scroll to about section")
            .with_language(En),
        VoiceCommand::scroll("scroll-projects-section", "go to projects section", "#projects")
            .with_keywords(["projects section", "scroll to projects"])
            .with_description("Scroll to projects section")
            .with_language(En),
        VoiceCommand::scroll("scroll-skills-section", "go to skills section", "#skills")
            .with_keywords(["skills section", "scroll to skills"])
            .with_description("Scroll to skills section")
            .with_language(En),
        VoiceCommand::scroll("scroll-contact-section", "go to contact section", "#contact")
            .with_keywords(["contact section", "scroll to contact"])
            .with_description("Scroll to contact section")
            .with_language(En),
    ]);

    // Listening control
    commands.extend([
        VoiceCommand::custom(START_LISTENING_IDS[0], "start listening")
            .with_keywords(["begin listening", "activate voice", "listen"])
            .with_description("Start voice recognition")
            .with_language(En),
        VoiceCommand::custom(STOP_LISTENING_IDS[0], "stop listening")
            .with_keywords(["end listening", "deactivate voice", "silence"])
            .with_description("Stop voice recognition")
            .with_language(En),
        VoiceCommand::custom(START_LISTENING_IDS[1], "sunna shuru karo")
            .with_keywords(["awaz suno", "listening start"])
            .with_description("आवाज़ पहचान शुरू करें")
            .with_language(Hi),
        VoiceCommand::custom(STOP_LISTENING_IDS[1], "sunna band karo")
            .with_keywords(["awaz band", "listening stop"])
            .with_description("आवाज़ पहचान बंद करें")
            .with_language(Hi),
    ]);

    commands
}

/// Whether `id` is one of the built-in start/stop listening commands
pub fn is_listening_control(id: &str) -> bool {
    START_LISTENING_IDS.contains(&id) || STOP_LISTENING_IDS.contains(&id)
}
