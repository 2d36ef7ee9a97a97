// ============================================================================
// MÓDULO DE INTERNACIONALIZACIÓN
// ============================================================================

use std::collections::HashMap;
use crate::models::BarcodeErrorKind;

/// Obtener diccionario de traducciones para un idioma
fn get_translations(lang: &str) -> HashMap<&'static str, &'static str> {
    let mut translations = HashMap::new();
    let lang_upper = lang.to_uppercase();

    match lang_upper.as_str() {
        "ES" => {
            translations.insert("start", "Escanear");
            translations.insert("scanning", "Apunte la cámara al código...");
            translations.insert("try_again", "¡Reintentar!");
            translations.insert("no", "No");
            translations.insert("close", "Cerrar");
            translations.insert("choose_barcode", "Se detectaron varios códigos, elija uno");
            translations.insert("error_permission", "Sin acceso a la cámara");
            translations.insert("error_video", "Algo salió mal con el vídeo");
            translations.insert("error_unknown", "Algo salió mal");
        }
        "FR" => {
            translations.insert("start", "Scanner");
            translations.insert("scanning", "Visez le code avec la caméra...");
            translations.insert("try_again", "Réessayer !");
            translations.insert("no", "Non");
            translations.insert("close", "Fermer");
            translations.insert("choose_barcode", "Plusieurs codes détectés, choisissez-en un");
            translations.insert("error_permission", "Pas d'accès à la caméra");
            translations.insert("error_video", "Un problème est survenu avec la vidéo");
            translations.insert("error_unknown", "Un problème est survenu");
        }
        _ => {
            translations.insert("start", "Start");
            translations.insert("scanning", "Point the camera at a barcode...");
            translations.insert("try_again", "Try again!");
            translations.insert("no", "No");
            translations.insert("close", "Close");
            translations.insert("choose_barcode", "Several barcodes found, pick one");
        }
    }

    translations
}

/// Función de traducción
///
/// String traducida o la clave si no se encuentra traducción
pub fn t(key: &str, lang: &str) -> String {
    let translations = get_translations(lang);

    if let Some(translation) = translations.get(key) {
        return translation.to_string();
    }

    // Fallback: devolver la clave si no hay traducción
    key.to_string()
}

/// Mensaje de error para mostrar al usuario.
/// En inglés (o sin traducción) se usa el mensaje del propio error.
pub fn error_message(kind: BarcodeErrorKind, fallback: &str, lang: &str) -> String {
    let key = match kind {
        BarcodeErrorKind::Permission => "error_permission",
        BarcodeErrorKind::Video => "error_video",
        BarcodeErrorKind::Unknown => "error_unknown",
        BarcodeErrorKind::Abort => return fallback.to_string(),
    };
    let translated = t(key, lang);
    if translated == key {
        fallback.to_string()
    } else {
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translations_with_fallback() {
        assert_eq!(t("try_again", "es"), "¡Reintentar!");
        assert_eq!(t("try_again", "EN"), "Try again!");
        assert_eq!(t("try_again", "de"), "Try again!");
        assert_eq!(t("unknown_key", "FR"), "unknown_key");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            error_message(BarcodeErrorKind::Permission, "No access to camera", "EN"),
            "No access to camera"
        );
        assert_eq!(
            error_message(BarcodeErrorKind::Permission, "No access to camera", "ES"),
            "Sin acceso a la cámara"
        );
    }
}
