table! {
    public.unidadeoperacional (id) {
        id -> Uuid,
        qap_lot_id -> Nullable<Int4>,
        descri -> Nullable<Varchar>,
        sigla -> Nullable<Varchar>,
        codigolotacao -> Nullable<Varchar>,
    }
}

table! {
    public.produtoquimico (id) {
        id -> Uuid,
        id_unidade -> Nullable<Int4>,
        qap_pro_id -> Int4,
        descricao -> Nullable<Varchar>,
    }
}

table! {
    public.horarioscoleta (id) {
        id -> Uuid,
        deschorario -> Varchar,
        id_iqap_horario -> Int4,
    }
}

table! {
    public.ocorrencias (id) {
        id -> Uuid,
        descricao -> Varchar,
        id_iqap_oco -> Int4,
    }
}

table! {
    public.tipocoleta (id) {
        id -> Uuid,
        tpc_id -> Int4,
        tpc_descri -> Nullable<Varchar>,
    }
}

table! {
    auth.users (id) {
        id -> Uuid,
        email -> Nullable<Varchar>,
    }
}

// qap_lot_id and tpc_id are text here, unlike every other unit reference
table! {
    public.monitoramentos (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
        deleted -> Nullable<Bool>,
        vazao -> Nullable<Varchar>,
        cor -> Nullable<Varchar>,
        turbidez -> Nullable<Varchar>,
        ph -> Nullable<Varchar>,
        cloro -> Nullable<Varchar>,
        imagem -> Nullable<Bytea>,
        data -> Nullable<Varchar>,
        hora -> Nullable<Varchar>,
        operador -> Nullable<Varchar>,
        laboratorista -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        ferro -> Nullable<Varchar>,
        manganes -> Nullable<Varchar>,
        aluminio -> Nullable<Varchar>,
        alcalinidade -> Nullable<Varchar>,
        fluor -> Nullable<Varchar>,
        ocorrencia_presente -> Bool,
        obs_ocorrencia -> Nullable<Varchar>,
        data_coleta -> Nullable<Varchar>,
        horario_manual -> Nullable<Varchar>,
        usuario_id -> Nullable<Uuid>,
        qap_lot_id -> Nullable<Varchar>,
        tpc_id -> Nullable<Varchar>,
        id_iqap_horario -> Int4,
        id_iqap_oco -> Nullable<Int4>,
    }
}

table! {
    public.aplicacaoprodutoquimico (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        ponto_aplicacao -> Nullable<Varchar>,
        quantidade -> Nullable<Float8>,
        usuario_id -> Nullable<Uuid>,
        email -> Nullable<Varchar>,
        data -> Nullable<Varchar>,
        hora -> Nullable<Varchar>,
        horario_manual -> Nullable<Varchar>,
        qap_lot_id -> Nullable<Int4>,
        id_iqap_horario -> Nullable<Int4>,
        qap_prod_id -> Int4,
    }
}

table! {
    public.estoqueinventario (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        quantidade -> Numeric,
        usuario_id -> Nullable<Uuid>,
        email -> Nullable<Varchar>,
        data -> Nullable<Varchar>,
        hora -> Nullable<Varchar>,
        horario_manual -> Nullable<Varchar>,
        qap_lot_id -> Int4,
        id_iqap_horario -> Int4,
        qap_prod_id -> Int4,
    }
}

table! {
    public.estoquerecebimento (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        quantidade -> Numeric,
        usuario_id -> Nullable<Uuid>,
        email -> Nullable<Varchar>,
        nota_fiscal -> Varchar,
        lote -> Varchar,
        data -> Nullable<Varchar>,
        hora -> Nullable<Varchar>,
        horario_manual -> Nullable<Varchar>,
        qap_lot_id -> Int4,
        id_iqap_horario -> Int4,
        qap_prod_id -> Int4,
    }
}

table! {
    public.lavagemdecantador (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        data -> Varchar,
        hora -> Varchar,
        numero_decantador -> Int4,
        tempo_lavagem -> Varchar,
        volume_utilizado -> Numeric,
        obs -> Nullable<Varchar>,
        usuario_id -> Nullable<Uuid>,
        email -> Nullable<Varchar>,
        tipo -> Nullable<Varchar>,
        horario_manual -> Nullable<Varchar>,
        qap_lot_id -> Int4,
        id_iqap_horario -> Int4,
    }
}

table! {
    public.lavagemfiltro (id) {
        id -> Uuid,
        created_at -> Nullable<Timestamptz>,
        data -> Varchar,
        hora -> Varchar,
        numero_filtro -> Int4,
        tempo_lavagem -> Varchar,
        volume_utilizado -> Numeric,
        obs -> Nullable<Varchar>,
        usuario_id -> Nullable<Uuid>,
        email -> Nullable<Varchar>,
        horario_manual -> Nullable<Varchar>,
        qap_lot_id -> Int4,
        id_iqap_horario -> Int4,
    }
}

table! {
    public.unidadetipocoleta (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        ativo -> Nullable<Int2>,
        qap_lot_id -> Nullable<Int4>,
        qap_tpc_id -> Nullable<Int4>,
    }
}

table! {
    public.usuariounidades (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        usr_codigo -> Int4,
        email -> Nullable<Varchar>,
        qap_lot_id -> Int4,
        id_supabase -> Nullable<Uuid>,
    }
}

allow_tables_to_appear_in_same_query!(
    aplicacaoprodutoquimico,
    estoqueinventario,
    estoquerecebimento,
    horarioscoleta,
    lavagemdecantador,
    lavagemfiltro,
    monitoramentos,
    ocorrencias,
    produtoquimico,
    tipocoleta,
    unidadeoperacional,
    unidadetipocoleta,
    users,
    usuariounidades,
);
