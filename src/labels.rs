// Bilingual field labels for printable documents
// Every label the profile sheets and cards print, EN and AR, keyed by the
// field names the rest of the system already uses

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ar,
}

/// Label for a core member field
pub fn member_label(field: &str, lang: Lang) -> Option<&'static str> {
    let (en, ar) = match field {
        "pkf_id" => ("Membership No.", "رقم العضوية"),
        "full_name" => ("Full Name (EN)", "الاسم الكامل (انجليزي)"),
        "full_name_ar" => ("Full Name (AR)", "الاسم الكامل (عربي)"),
        "passport_number" => ("Passport No.", "رقم جواز السفر"),
        "passport_expiry_date" => ("Passport Expiry", "انتهاء صلاحية الجواز"),
        "role" => ("Role", "الدور"),
        "club_name" => ("Club", "النادي"),
        "dob" => ("Date of Birth", "تاريخ الميلاد"),
        "current_belt" => ("Current Belt", "الحزام الحالي"),
        "expiry_date" => ("Expiry Date", "تاريخ الانتهاء"),
        "phone" => ("Phone", "الهاتف"),
        "email" => ("Email", "البريد الإلكتروني"),
        "profession" => ("Profession", "المهنة"),
        "notes" => ("Notes", "ملاحظات"),
        _ => return None,
    };

    Some(match lang {
        Lang::En => en,
        Lang::Ar => ar,
    })
}

/// Label for a club field
pub fn club_label(field: &str, lang: Lang) -> Option<&'static str> {
    let (en, ar) = match field {
        "club_membership_id" => ("Membership ID", "رقم عضوية النادي"),
        "name" => ("Club Name", "اسم النادي"),
        "representative_name" => ("Representative", "اسم الممثل"),
        "representative_gender" => ("Rep. Gender", "جنس الممثل"),
        "classification" => ("Classification", "التصنيف"),
        "address" => ("Address", "العنوان"),
        "phone" => ("Phone", "الهاتف"),
        "email" => ("Email", "البريد الإلكتروني"),
        "affiliation_date" => ("Affiliation Date", "تاريخ الانتساب"),
        "subscription_expiry_date" => ("Subscription Expiry", "انتهاء الاشتراك"),
        "points" => ("Points", "النقاط"),
        _ => return None,
    };

    Some(match lang {
        Lang::En => en,
        Lang::Ar => ar,
    })
}

/// Label for a role-specific detail field, keyed by the serialized key names
pub fn detail_label(field: &str, lang: Lang) -> Option<&'static str> {
    let (en, ar) = match field {
        // Player
        "kata_check" => ("Participates in Kata", "يشارك في الكاتا"),
        "kumite_check" => ("Participates in Kumite", "يشارك في الكوميتيه"),
        "weight" => ("Weight (kg)", "الوزن (كغم)"),
        "nat_rank" => ("National Rank", "التصنيف الوطني"),
        "int_rank" => ("International Rank", "التصنيف الدولي"),
        // Coach
        "coach_national_degree" => ("National Degree", "الدرجة الوطنية"),
        "coach_asian_degree" => ("Asian Degree", "الدرجة الآسيوية"),
        "coach_international_degree" => ("International Degree", "الدرجة الدولية"),
        // Referee
        "ref_kata_national_degree" => ("Kata National Degree", "درجة كاتا الوطنية"),
        "ref_kata_asian_degree" => ("Kata Asian Degree", "درجة كاتا الآسيوية"),
        "ref_kata_international_degree" => ("Kata International Degree", "درجة كاتا الدولية"),
        "ref_kumite_national_degree" => ("Kumite National Degree", "درجة كوميتيه الوطنية"),
        "ref_kumite_asian_degree" => ("Kumite Asian Degree", "درجة كوميتيه الآسيوية"),
        "ref_kumite_international_degree" => ("Kumite International Degree", "درجة كوميتيه الدولية"),
        "license_date" => ("License Date", "تاريخ الرخصة"),
        // Admin
        "admin_title" => ("Admin Title", "المنصب الإداري"),
        // Derived
        "competition_categories" => ("Selected Categories", "الفئات المختارة"),
        _ => return None,
    };

    Some(match lang {
        Lang::En => en,
        Lang::Ar => ar,
    })
}

/// Label for an attachment kind on the profile sheet
pub fn attachment_label(kind: &str, lang: Lang) -> Option<&'static str> {
    let (en, ar) = match kind {
        "identity_docs" => ("Identity Documents", "مستندات الهوية"),
        "belt_certs" => ("Belt Certificates", "شهادات الأحزمة"),
        "coach_certs" => ("Coaching Certificates", "شهادات التدريب"),
        "referee_certs" => ("Refereeing Certificates", "شهادات التحكيم"),
        "payment_receipts" => ("Payment Receipts", "إيصالات الدفع"),
        "federation_license" => ("Federation License", "رخصة الاتحاد"),
        "olympic_license" => ("Olympic Committee License", "رخصة اللجنة الأولمبية"),
        _ => return None,
    };

    Some(match lang {
        Lang::En => en,
        Lang::Ar => ar,
    })
}
