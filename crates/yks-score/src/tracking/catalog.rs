use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Study subjects and the topics a student works through in each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCatalog {
    subjects: Vec<CatalogSubject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSubject {
    pub key: String,
    pub label: String,
    pub topics: Vec<String>,
}

impl CatalogSubject {
    pub fn new(key: &str, label: &str, topics: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            topics: topics.iter().map(|topic| topic.to_string()).collect(),
        }
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|known| known == topic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog subject keys must not be blank")]
    BlankSubjectKey,
    #[error("catalog lists subject '{0}' more than once")]
    DuplicateSubject(String),
    #[error("subject '{subject}' lists topic '{topic}' more than once")]
    DuplicateTopic { subject: String, topic: String },
}

/// Lookup failures for a subject/topic pair supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownTopic {
    #[error("unknown study subject '{0}'")]
    Subject(String),
    #[error("subject '{subject}' has no topic '{topic}'")]
    Topic { subject: String, topic: String },
}

impl TopicCatalog {
    pub fn new(subjects: Vec<CatalogSubject>) -> Result<Self, CatalogError> {
        let mut keys = HashSet::new();
        for subject in &subjects {
            if subject.key.trim().is_empty() {
                return Err(CatalogError::BlankSubjectKey);
            }
            if !keys.insert(subject.key.as_str()) {
                return Err(CatalogError::DuplicateSubject(subject.key.clone()));
            }
            let mut topics = HashSet::new();
            for topic in &subject.topics {
                if !topics.insert(topic.as_str()) {
                    return Err(CatalogError::DuplicateTopic {
                        subject: subject.key.clone(),
                        topic: topic.clone(),
                    });
                }
            }
        }
        Ok(Self { subjects })
    }

    /// 2024 YKS subjects and topics, built once per process.
    pub fn standard() -> &'static TopicCatalog {
        static STANDARD: OnceLock<TopicCatalog> = OnceLock::new();
        STANDARD.get_or_init(standard_catalog)
    }

    pub fn subjects(&self) -> &[CatalogSubject] {
        &self.subjects
    }

    pub fn subject(&self, key: &str) -> Option<&CatalogSubject> {
        self.subjects.iter().find(|subject| subject.key == key)
    }

    /// Resolve a client-supplied pair, returning the catalog's own subject entry.
    pub fn resolve(&self, subject: &str, topic: &str) -> Result<&CatalogSubject, UnknownTopic> {
        let entry = self
            .subject(subject.trim())
            .ok_or_else(|| UnknownTopic::Subject(subject.trim().to_string()))?;
        if !entry.has_topic(topic.trim()) {
            return Err(UnknownTopic::Topic {
                subject: entry.key.clone(),
                topic: topic.trim().to_string(),
            });
        }
        Ok(entry)
    }
}

fn standard_catalog() -> TopicCatalog {
    TopicCatalog {
        subjects: vec![
            CatalogSubject::new(
                "turkish",
                "Türkçe",
                &[
                    "Sözcükte Anlam",
                    "Cümlede Anlam",
                    "Paragrafta Anlam",
                    "Dil Bilgisi",
                    "Yazım Kuralları",
                    "Noktalama İşaretleri",
                    "Anlatım Bozuklukları",
                    "Söz Sanatları",
                    "Paragraf Yapısı",
                    "Metin Türleri",
                ],
            ),
            CatalogSubject::new(
                "mathematics",
                "Matematik",
                &[
                    "Temel Kavramlar",
                    "Sayılar",
                    "Rasyonel Sayılar",
                    "Denklemler ve Eşitsizlikler",
                    "Üslü Sayılar",
                    "Köklü Sayılar",
                    "Oran-Orantı",
                    "Problemler",
                    "Fonksiyonlar",
                    "Polinomlar",
                    "Olasılık",
                    "İstatistik",
                    "Türev",
                    "İntegral",
                    "Trigonometri",
                    "Logaritma",
                    "Diziler",
                    "Karmaşık Sayılar",
                    "Limit",
                ],
            ),
            CatalogSubject::new(
                "physics",
                "Fizik",
                &[
                    "Fizik Bilimine Giriş",
                    "Madde ve Özellikleri",
                    "Kuvvet ve Hareket",
                    "Enerji",
                    "Isı ve Sıcaklık",
                    "Elektrostatik",
                    "Elektrik",
                    "Manyetizma",
                    "Dalgalar",
                    "Optik",
                    "Modern Fizik",
                    "Atom Fiziği",
                    "Çekirdek Fiziği",
                ],
            ),
            CatalogSubject::new(
                "chemistry",
                "Kimya",
                &[
                    "Kimya Bilimi",
                    "Atom ve Periyodik Sistem",
                    "Kimyasal Türler Arası Etkileşimler",
                    "Maddenin Halleri",
                    "Kimyasal Tepkimeler",
                    "Kimyanın Temel Kanunları",
                    "Asitler ve Bazlar",
                    "Karışımlar",
                    "Endüstride ve Canlılarda Enerji",
                    "Organik Kimya",
                    "Karbon Kimyası",
                    "Kimya ve Elektrik",
                    "Çözeltiler",
                    "Kimyasal Hesaplamalar",
                ],
            ),
            CatalogSubject::new(
                "biology",
                "Biyoloji",
                &[
                    "Canlıların Yapısı",
                    "Hücre",
                    "Canlıların Sınıflandırılması",
                    "Kalıtım",
                    "Ekosistem Ekolojisi",
                    "Bitki Biyolojisi",
                    "İnsan Fizyolojisi",
                    "Sinir Sistemi",
                    "Endokrin Sistem",
                    "Duyu Organları",
                    "Destek ve Hareket Sistemi",
                    "Sindirim Sistemi",
                    "Dolaşım Sistemi",
                    "Solunum Sistemi",
                    "Boşaltım Sistemi",
                    "Üreme Sistemi",
                    "Komünite ve Popülasyon Ekolojisi",
                    "Genetik Mühendisliği",
                ],
            ),
            CatalogSubject::new(
                "history",
                "Tarih",
                &[
                    "Tarih Bilimi",
                    "İlk Çağ Uygarlıkları",
                    "İslamiyet Öncesi Türk Tarihi",
                    "İslam Tarihi ve Uygarlığı",
                    "Türk-İslam Devletleri",
                    "Türkiye Tarihi",
                    "Osmanlı Devleti Kuruluş Dönemi",
                    "Osmanlı Devleti Yükselme Dönemi",
                    "Osmanlı Devleti Duraklama Dönemi",
                    "Osmanlı Devleti Gerileme Dönemi",
                    "Osmanlı Devleti Dağılma Dönemi",
                    "I. Dünya Savaşı",
                    "Kurtuluş Savaşı",
                    "Atatürk Dönemi",
                    "İnkılaplar",
                    "Çağdaş Türk ve Dünya Tarihi",
                ],
            ),
            CatalogSubject::new(
                "geography",
                "Coğrafya",
                &[
                    "Doğa ve İnsan",
                    "Dünya'nın Şekli ve Hareketleri",
                    "Haritalar",
                    "İklim Bilgisi",
                    "Türkiye'nin İklimi",
                    "Yerşekilleri",
                    "Türkiye'nin Yerşekilleri",
                    "Nüfus",
                    "Türkiye'nin Nüfusu",
                    "Yerleşme",
                    "Türkiye'nin Yerleşme Özellikleri",
                    "Ekonomik Faaliyetler",
                    "Türkiye Ekonomisi",
                    "Bölgesel Kalkınma Projeleri",
                    "Uluslararası Ulaşım Hatları",
                    "Çevre ve Toplum",
                    "Doğal Afetler",
                ],
            ),
            CatalogSubject::new(
                "philosophy",
                "Felsefe",
                &[
                    "Felsefeye Giriş",
                    "Bilgi Felsefesi",
                    "Varlık Felsefesi",
                    "Ahlak Felsefesi",
                    "Sanat Felsefesi",
                    "Din Felsefesi",
                    "Siyaset Felsefesi",
                    "Bilim Felsefesi",
                    "Mantık",
                    "Psikoloji",
                    "Sosyoloji",
                ],
            ),
            CatalogSubject::new(
                "literature",
                "Edebiyat",
                &[
                    "Edebiyat Akımları",
                    "Divan Edebiyatı",
                    "Halk Edebiyatı",
                    "Tanzimat Edebiyatı",
                    "Servet-i Fünun Edebiyatı",
                    "Fecr-i Ati Edebiyatı",
                    "Milli Edebiyat",
                    "Cumhuriyet Dönemi Edebiyatı",
                    "Şiir Bilgisi",
                    "Roman",
                    "Hikâye",
                    "Tiyatro",
                    "Dil Bilgisi",
                    "Dünya Edebiyatı",
                ],
            ),
            CatalogSubject::new(
                "religion",
                "Din Kültürü",
                &[
                    "İnanç",
                    "İbadet",
                    "Ahlak",
                    "Hz. Muhammed'in Hayatı",
                    "Kur'an ve Yorumu",
                    "İslam Düşüncesi",
                    "İslam ve Bilim",
                    "Yaşayan Dinler",
                    "Vahiy ve Akıl",
                    "İslam ve Toplum",
                ],
            ),
            CatalogSubject::new(
                "english",
                "Yabancı Dil (İngilizce)",
                &[
                    "Kelime Bilgisi",
                    "Dilbilgisi",
                    "Okuma Anlama",
                    "Diyalog Tamamlama",
                    "Paragraf Tamamlama",
                    "Cümle Tamamlama",
                    "Cloze Test",
                    "Çeviri",
                    "Eş Anlamlı Cümle Bulma",
                    "Yakın Anlamlı Cümle Bulma",
                ],
            ),
        ],
    }
}
