//! # ewk-shim : widget navigateur et méthode de saisie
//!
//! Couche d'intégration qui expose un moteur de rendu sous forme de widget :
//! elle traduit les événements du toolkit, les rappels de la méthode de
//! saisie native (IMF) et les gestes vers le modèle d'événements du moteur,
//! et remonte l'état du moteur sous forme de signaux nommés.
//!
//! ## Architecture des modules
//!
//! - [`ime_session`] : Session IME, contexte natif, focus, composition en
//!   cours, files de commits et de preedits.
//!
//! - [`sequencer`] : Ordonnancement des touches : retient les key-down, génère
//!   les key-up et vide les files à chaque acquittement du moteur.
//!
//! - [`render`] : Façade vers le moteur (`RenderWidgetHost`) et canal
//!   d'acquittement.
//!
//! - [`view`] : Contrôleur par widget, relie session, séquenceur et moteur.
//!
//! - [`panel`] : Choix du clavier virtuel selon le type de champ.
//!
//! - [`imf`] : Traits de la méthode de saisie native et ses rappels.
//!
//! - [`keyutils`] / [`winit_ime`] / [`shell`] : Shell de démonstration sur
//!   Winit, avec un moteur texte minimal ([`engine`]).

pub mod config;
pub mod engine;
pub mod events;
pub mod ime_session;
pub mod imf;
pub mod keyutils;
pub mod panel;
pub mod queue;
pub mod registry;
pub mod render;
pub mod sequencer;
pub mod shell;
pub mod signals;
pub mod view;
pub mod winit_ime;

#[cfg(test)]
mod test_support;
