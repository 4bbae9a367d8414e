use get_if_addrs::get_if_addrs;
use std::net::UdpSocket;

/// Devine l'adresse IP locale de la machine.
///
/// Crée un socket UDP lié à `0.0.0.0:0` puis le "connecte" vers un serveur
/// DNS public (8.8.8.8). UDP étant sans connexion, aucun paquet n'est émis :
/// on demande simplement au système quelle interface serait utilisée pour
/// joindre l'adresse cible.
///
/// # Returns
///
/// L'adresse IP locale sous forme de `String`, ou `"127.0.0.1"` en cas
/// d'échec à n'importe quelle étape.
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// Liste toutes les adresses IPv4 non-loopback des interfaces réseau.
///
/// En cas d'erreur lors de la récupération des interfaces, retourne une
/// HashMap contenant une entrée `"error"` avec un message d'erreur.
#[allow(dead_code)]
fn list_all_ips() -> std::collections::HashMap<String, Vec<String>> {
    let mut result = std::collections::HashMap::new();

    if let Ok(interfaces) = get_if_addrs() {
        for iface in interfaces {
            let ip = iface.ip();
            if ip.is_loopback() {
                continue;
            }
            if ip.is_ipv4() {
                result
                    .entry(iface.name)
                    .or_insert_with(Vec::new)
                    .push(ip.to_string());
            }
        }
    } else {
        result.insert(
            "error".to_string(),
            vec!["Failed to get interfaces".to_string()],
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[test]
    fn test_guess_local_ip_returns_valid_ip() {
        let ip = guess_local_ip();

        // Vérifie que le résultat est parsable comme une IP
        assert!(
            ip.parse::<IpAddr>().is_ok(),
            "Should return a valid IP address"
        );
    }

    #[test]
    fn test_guess_local_ip_not_empty() {
        let ip = guess_local_ip();

        assert!(!ip.is_empty(), "IP should not be empty");
    }

    #[test]
    fn test_list_all_ips_no_loopback() {
        let ips = list_all_ips();

        for (_, addresses) in ips.iter() {
            for addr in addresses {
                if let Ok(parsed_ip) = addr.parse::<IpAddr>() {
                    assert!(
                        !parsed_ip.is_loopback(),
                        "Loopback addresses should be filtered out"
                    );
                }
            }
        }
    }
}
