/// Utilitaires pour la gestion des adresses IP réseau.
///
/// Ce module fournit des fonctions pour détecter les adresses IP des
/// interfaces réseau locales de la machine, utilisées pour construire
/// l'URL publique du serveur quand elle n'est pas configurée.
mod ip_utils;

pub use ip_utils::guess_local_ip;
