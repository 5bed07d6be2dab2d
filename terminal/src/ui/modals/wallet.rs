//! Wallet modal: load a local keypair (file or base58 secret) or disconnect.

use crate::app::{App, AppState};
use crate::ui::theme::Theme;
use crate::ui::widgets::links;

pub fn render(ui: &mut egui::Ui, state: &AppState, app: &mut App, theme: &Theme) {
    if let Some(pubkey) = state.wallet.pubkey() {
        let explorer = app.services.settings.explorer();
        let cluster = app.services.connection.cluster();
        ui.label("Connected");
        links::account_link(ui, &pubkey.to_string(), explorer, cluster);
        ui.add_space(12.0);
        if ui.button("Disconnect").clicked() {
            app.handle_wallet_disconnect();
        }
        return;
    }

    let form = &state.wallet_form;

    ui.label("Keypair file");
    ui.horizontal(|ui| {
        let mut path = form.keypair_path.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut path)
                .hint_text("~/.config/solana/id.json")
                .desired_width(280.0),
        );
        if response.changed() {
            app.state.write().wallet_form.keypair_path = path;
        }
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Load").clicked() || submitted {
            app.handle_wallet_load_file();
        }
    });

    ui.add_space(8.0);
    ui.label("Secret key");
    ui.horizontal(|ui| {
        let mut secret = form.secret_key.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut secret)
                .password(true)
                .hint_text("Base58 secret key")
                .desired_width(280.0),
        );
        if response.changed() {
            app.state.write().wallet_form.secret_key = secret;
        }
        if ui.button("Import").clicked() {
            app.handle_wallet_load_secret();
        }
    });

    if let Some(error) = &form.error {
        ui.add_space(6.0);
        ui.colored_label(theme.error, error.as_str());
    }
}
