use std::fmt;

use url::Url;

/// Site a queued link points at, used for the row label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Facebook,
    TikTok,
    Instagram,
    Pinterest,
    Twitter,
    LinkedIn,
    Reddit,
    Twitch,
    Snapchat,
    Vk,
    RedNote,
    Bilibili,
    Vimeo,
    Other,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Pinterest => "Pinterest",
            Platform::Twitter => "X",
            Platform::LinkedIn => "LinkedIn",
            Platform::Reddit => "Reddit",
            Platform::Twitch => "Twitch",
            Platform::Snapchat => "Snapchat",
            Platform::Vk => "VK",
            Platform::RedNote => "RedNote",
            Platform::Bilibili => "Bilibili",
            Platform::Vimeo => "Vimeo",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

const HOSTS: &[(&str, Platform)] = &[
    ("youtube.com", Platform::YouTube),
    ("youtu.be", Platform::YouTube),
    ("facebook.com", Platform::Facebook),
    ("fb.watch", Platform::Facebook),
    ("tiktok.com", Platform::TikTok),
    ("instagram.com", Platform::Instagram),
    ("pinterest.com", Platform::Pinterest),
    ("pin.it", Platform::Pinterest),
    ("x.com", Platform::Twitter),
    ("twitter.com", Platform::Twitter),
    ("linkedin.com", Platform::LinkedIn),
    ("reddit.com", Platform::Reddit),
    ("redd.it", Platform::Reddit),
    ("twitch.tv", Platform::Twitch),
    ("snapchat.com", Platform::Snapchat),
    ("vk.com", Platform::Vk),
    ("xiaohongshu.com", Platform::RedNote),
    ("xhslink.com", Platform::RedNote),
    ("bilibili.com", Platform::Bilibili),
    ("b23.tv", Platform::Bilibili),
    ("vimeo.com", Platform::Vimeo),
];

/// Match on the host when the link parses, else on the raw text.
pub fn detect_platform(raw: &str) -> Platform {
    let trimmed = raw.trim();
    let host = Url::parse(trimmed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase));

    match host {
        Some(host) => HOSTS
            .iter()
            .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
            .map(|(_, platform)| *platform)
            .unwrap_or(Platform::Other),
        None => {
            let lower = trimmed.to_ascii_lowercase();
            HOSTS
                .iter()
                .find(|(domain, _)| lower.contains(domain))
                .map(|(_, platform)| *platform)
                .unwrap_or(Platform::Other)
        }
    }
}
