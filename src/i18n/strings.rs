//! Built-in common words table.
//!
//! Short, frequently reused UI words (buttons, states) for every supported
//! language. A catalog directory may ship its own `common.json`; entries there
//! override the words below.

use crate::i18n::Language;
use std::collections::BTreeMap;

/// Common words for one language.
#[derive(Debug, Clone, Copy)]
pub struct CommonWords {
    pub language: Language,
    pub words: &'static [(&'static str, &'static str)],
}

// ==================== Word Tables ====================

pub const ENGLISH_WORDS: CommonWords = CommonWords {
    language: Language::ENGLISH,
    words: &[
        ("loading", "Loading"),
        ("error", "Error"),
        ("success", "Success"),
        ("save", "Save"),
        ("cancel", "Cancel"),
        ("confirm", "Confirm"),
        ("back", "Back"),
        ("next", "Next"),
        ("yes", "Yes"),
        ("no", "No"),
        ("close", "Close"),
        ("open", "Open"),
    ],
};

pub const SPANISH_WORDS: CommonWords = CommonWords {
    language: Language::SPANISH,
    words: &[
        ("loading", "Cargando"),
        ("error", "Error"),
        ("success", "Éxito"),
        ("save", "Guardar"),
        ("cancel", "Cancelar"),
        ("confirm", "Confirmar"),
        ("back", "Volver"),
        ("next", "Siguiente"),
        ("yes", "Sí"),
        ("no", "No"),
        ("close", "Cerrar"),
        ("open", "Abrir"),
    ],
};

pub const FRENCH_WORDS: CommonWords = CommonWords {
    language: Language::FRENCH,
    words: &[
        ("loading", "Chargement"),
        ("error", "Erreur"),
        ("success", "Succès"),
        ("save", "Enregistrer"),
        ("cancel", "Annuler"),
        ("confirm", "Confirmer"),
        ("back", "Retour"),
        ("next", "Suivant"),
        ("yes", "Oui"),
        ("no", "Non"),
        ("close", "Fermer"),
        ("open", "Ouvrir"),
    ],
};

pub const GERMAN_WORDS: CommonWords = CommonWords {
    language: Language::GERMAN,
    words: &[
        ("loading", "Wird geladen"),
        ("error", "Fehler"),
        ("success", "Erfolg"),
        ("save", "Speichern"),
        ("cancel", "Abbrechen"),
        ("confirm", "Bestätigen"),
        ("back", "Zurück"),
        ("next", "Weiter"),
        ("yes", "Ja"),
        ("no", "Nein"),
        ("close", "Schließen"),
        ("open", "Öffnen"),
    ],
};

pub const PORTUGUESE_WORDS: CommonWords = CommonWords {
    language: Language::PORTUGUESE,
    words: &[
        ("loading", "Carregando"),
        ("error", "Erro"),
        ("success", "Sucesso"),
        ("save", "Salvar"),
        ("cancel", "Cancelar"),
        ("confirm", "Confirmar"),
        ("back", "Voltar"),
        ("next", "Próximo"),
        ("yes", "Sim"),
        ("no", "Não"),
        ("close", "Fechar"),
        ("open", "Abrir"),
    ],
};

pub const ITALIAN_WORDS: CommonWords = CommonWords {
    language: Language::ITALIAN,
    words: &[
        ("loading", "Caricamento"),
        ("error", "Errore"),
        ("success", "Successo"),
        ("save", "Salva"),
        ("cancel", "Annulla"),
        ("confirm", "Conferma"),
        ("back", "Indietro"),
        ("next", "Avanti"),
        ("yes", "Sì"),
        ("no", "No"),
        ("close", "Chiudi"),
        ("open", "Apri"),
    ],
};

pub const CHINESE_WORDS: CommonWords = CommonWords {
    language: Language::CHINESE,
    words: &[
        ("loading", "加载中"),
        ("error", "错误"),
        ("success", "成功"),
        ("save", "保存"),
        ("cancel", "取消"),
        ("confirm", "确认"),
        ("back", "返回"),
        ("next", "下一步"),
        ("yes", "是"),
        ("no", "否"),
        ("close", "关闭"),
        ("open", "打开"),
    ],
};

pub const HINDI_WORDS: CommonWords = CommonWords {
    language: Language::HINDI,
    words: &[
        ("loading", "लोड हो रहा है"),
        ("error", "त्रुटि"),
        ("success", "सफलता"),
        ("save", "सहेजें"),
        ("cancel", "रद्द करें"),
        ("confirm", "पुष्टि करें"),
        ("back", "वापस"),
        ("next", "अगला"),
        ("yes", "हाँ"),
        ("no", "नहीं"),
        ("close", "बंद करें"),
        ("open", "खोलें"),
    ],
};

pub const ARABIC_WORDS: CommonWords = CommonWords {
    language: Language::ARABIC,
    words: &[
        ("loading", "جار التحميل"),
        ("error", "خطأ"),
        ("success", "نجاح"),
        ("save", "حفظ"),
        ("cancel", "إلغاء"),
        ("confirm", "تأكيد"),
        ("back", "رجوع"),
        ("next", "التالي"),
        ("yes", "نعم"),
        ("no", "لا"),
        ("close", "إغلاق"),
        ("open", "فتح"),
    ],
};

pub const RUSSIAN_WORDS: CommonWords = CommonWords {
    language: Language::RUSSIAN,
    words: &[
        ("loading", "Загрузка"),
        ("error", "Ошибка"),
        ("success", "Успех"),
        ("save", "Сохранить"),
        ("cancel", "Отмена"),
        ("confirm", "Подтвердить"),
        ("back", "Назад"),
        ("next", "Далее"),
        ("yes", "Да"),
        ("no", "Нет"),
        ("close", "Закрыть"),
        ("open", "Открыть"),
    ],
};

const ALL_WORDS: [CommonWords; 10] = [
    SPANISH_WORDS,
    ENGLISH_WORDS,
    FRENCH_WORDS,
    GERMAN_WORDS,
    PORTUGUESE_WORDS,
    ITALIAN_WORDS,
    CHINESE_WORDS,
    HINDI_WORDS,
    ARABIC_WORDS,
    RUSSIAN_WORDS,
];

/// Word table keyed by language, as stored in a `Catalog`.
pub type CommonWordTable = BTreeMap<Language, BTreeMap<String, String>>;

/// Build the owned common-words table from the built-in data.
pub fn builtin_common_words() -> CommonWordTable {
    ALL_WORDS
        .iter()
        .map(|table| {
            let words = table
                .words
                .iter()
                .map(|(word, value)| (word.to_string(), value.to_string()))
                .collect();
            (table.language, words)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_a_table() {
        let table = builtin_common_words();
        for language in Language::all() {
            assert!(table.contains_key(&language), "missing {}", language);
        }
    }

    #[test]
    fn test_every_table_has_the_english_words() {
        let table = builtin_common_words();
        let english = &table[&Language::ENGLISH];

        for (language, words) in &table {
            for word in english.keys() {
                assert!(
                    words.get(word).is_some_and(|v| !v.trim().is_empty()),
                    "{} is missing common word '{}'",
                    language,
                    word
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        let table = builtin_common_words();
        assert_eq!(table[&Language::GERMAN]["cancel"], "Abbrechen");
        assert_eq!(table[&Language::ARABIC]["yes"], "نعم");
    }
}
