diesel::table! {
    rsvp (id) {
        id -> Text,
        created_at -> Text,
        code -> Text,
        first_name -> Text,
        last_name -> Text,
        plus_one -> Text,
        guest_name -> Nullable<Text>,
        notify -> Text,
        email -> Nullable<Text>,
        phone -> Nullable<Text>,
        diet -> Nullable<Text>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    concierge_request (id) {
        id -> Text,
        created_at -> Text,
        full_name -> Text,
        email -> Text,
        phone -> Nullable<Text>,
        type_of_request -> Text,
        date -> Nullable<Text>,
        time -> Nullable<Text>,
        party_size -> Nullable<Text>,
        neighborhood -> Nullable<Text>,
        budget -> Nullable<Text>,
        details -> Nullable<Text>,
    }
}

diesel::table! {
    application (id) {
        id -> Text,
        created_at -> Text,
        full_name -> Text,
        dob -> Text,
        email -> Text,
        phone -> Text,
        address -> Text,
        city -> Text,
        state -> Text,
        country -> Text,
        company -> Text,
        industry -> Text,
        role -> Text,
        bio -> Text,
        socials -> Nullable<Text>,
        headshot_key -> Nullable<Text>,
    }
}
