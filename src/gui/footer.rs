//! Static footer with the author's links.

use egui::{Hyperlink, RichText};

/// An outbound footer link.
pub struct FooterLink {
    pub icon: &'static str,
    pub label: &'static str,
    pub url: &'static str,
}

pub const AUTHOR_LINE: &str = "Made with ❤ by Ali Akber";

pub const FOOTER_LINKS: [FooterLink; 3] = [
    FooterLink {
        icon: "🐙",
        label: "GitHub",
        url: "https://github.com/AliAkber12/Ali-Akber",
    },
    FooterLink {
        icon: "📊",
        label: "Kaggle",
        url: "https://www.kaggle.com/",
    },
    FooterLink {
        icon: "💼",
        label: "LinkedIn",
        url: "https://www.linkedin.com/in/ali-akber-chandio-480344329/",
    },
];

pub fn show(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            // Centre the row by padding with half of the leftover width
            let row_width = 420.0;
            ui.add_space(((ui.available_width() - row_width) / 2.0).max(0.0));
            ui.label(RichText::new(AUTHOR_LINE).size(13.0));
            for link in &FOOTER_LINKS {
                ui.add_space(10.0);
                ui.add(
                    Hyperlink::from_label_and_url(
                        RichText::new(format!("{} {}", link.icon, link.label)).size(13.0),
                        link.url,
                    )
                    .open_in_new_tab(true),
                );
            }
        });
        ui.add_space(6.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_are_https() {
        assert_eq!(FOOTER_LINKS.len(), 3);
        for link in &FOOTER_LINKS {
            assert!(link.url.starts_with("https://"), "{}", link.url);
        }
    }
}
